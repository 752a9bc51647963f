use crate::content::SkillCategory;

/// Which skill cards are showing their back face.
///
/// One flag per category, all face-up initially. Flipping one card never
/// touches the others.
pub struct SkillDeck {
    categories: &'static [SkillCategory],
    flipped: Vec<bool>,
}

impl SkillDeck {
    pub fn new(categories: &'static [SkillCategory]) -> Self {
        Self {
            categories,
            flipped: vec![false; categories.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Flips the card at `index`. Returns its new state, or `None` if there is no such card.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let flag = self.flipped.get_mut(index)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Flips the card with the given category name.
    pub fn toggle_named(&mut self, name: &str) -> Option<bool> {
        let index = self.categories.iter().position(|c| c.name == name)?;
        self.toggle(index)
    }

    pub fn is_flipped(&self, index: usize) -> bool {
        self.flipped.get(index).copied().unwrap_or(false)
    }

    pub fn category(&self, index: usize) -> Option<&'static SkillCategory> {
        self.categories.get(index)
    }

    /// Cards currently showing their skill list.
    pub fn flipped(&self) -> impl Iterator<Item = &'static SkillCategory> + '_ {
        self.categories
            .iter()
            .zip(&self.flipped)
            .filter_map(|(c, f)| f.then_some(c))
    }
}
