//! Static page content.

pub struct Profile {
    pub name: &'static str,
    pub role: &'static str,
    pub tagline: &'static str,
    pub location: &'static str,
    pub email: &'static str,
}

pub struct NavItem {
    pub label: &'static str,
}

impl NavItem {
    /// In-page anchor of the section, e.g. `#skills`.
    pub fn anchor(&self) -> String {
        format!("#{}", self.label.to_lowercase())
    }
}

pub struct Highlight {
    pub title: &'static str,
    pub body: &'static str,
}

pub struct About {
    pub paragraphs: &'static [&'static str],
    pub highlights: &'static [Highlight],
}

pub struct SkillCategory {
    pub name: &'static str,
    pub skills: &'static [&'static str],
}

pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub tech: &'static [&'static str],
    pub highlights: &'static [&'static str],
}

pub struct ContactLink {
    pub label: &'static str,
    pub caption: &'static str,
    pub href: &'static str,
}

pub const PROFILE: Profile = Profile {
    name: "Bharath M",
    role: "Python & AI/ML Developer",
    tagline: "Building the future, one algorithm at a time!",
    location: "Bengaluru, Karnataka",
    email: "bharathmanjunath03@gmail.com",
};

pub const NAV: &[NavItem] = &[
    NavItem { label: "About" },
    NavItem { label: "Skills" },
    NavItem { label: "Projects" },
    NavItem { label: "Contact" },
];

pub const ABOUT: About = About {
    paragraphs: &[
        "I'm a passionate AI/ML Developer currently pursuing my B.E. in Information Science \
         and Engineering. My journey in artificial intelligence began with a fascination for \
         how machines can understand and interpret our world.",
        "Currently working as an AI/ML Intern at WizzyBox, where I've optimized LLM integration \
         to reduce latency by 53% and co-developed intelligent interview systems that bridge \
         the gap between human resources and artificial intelligence.",
        "My expertise spans across computer vision, natural language processing, and generative AI, \
         with hands-on experience in building scalable, real-world applications.",
    ],
    highlights: &[
        Highlight {
            title: "Current Focus",
            body: "Specializing in LLM integration, computer vision systems, and building \
                   AI-powered applications that solve real-world problems.",
        },
        Highlight {
            title: "Achievement",
            body: "Reduced LLM latency by 53% at WizzyBox through optimization techniques \
                   and efficient system architecture.",
        },
    ],
};

/// Skill cards, in display order.
pub const SKILLS: &[SkillCategory] = &[
    SkillCategory {
        name: "AI & Machine Learning",
        skills: &[
            "Python",
            "TensorFlow",
            "OpenCV",
            "Scikit-learn",
            "NLP",
            "Computer Vision",
            "MediaPipe",
            "PyTesseract",
        ],
    },
    SkillCategory {
        name: "Generative AI",
        skills: &[
            "Gemini API",
            "Llama",
            "Mistral",
            "Prompt Engineering",
            "LLM Integration",
            "Ollama",
        ],
    },
    SkillCategory {
        name: "Web & Development",
        skills: &["Django", "REST API", "MySQL", "Git", "Jupyter"],
    },
    SkillCategory {
        name: "Programming Languages",
        skills: &["Python", "Java", "C"],
    },
];

pub const PROJECTS: &[Project] = &[
    Project {
        title: "Occlusion-Aware Face Recognition",
        description: "Real-time face recognition system using YOLOv8, HOG/CNN encoders with \
                      advanced occlusion handling capabilities.",
        tech: &["Python", "YOLOv8", "OpenCV", "Deep Learning"],
        highlights: &["Real-time processing", "Occlusion detection", "Webcam integration"],
    },
    Project {
        title: "AI Resume Analysis & ATS Optimizer",
        description: "Intelligent resume parsing and scoring system with mock interview \
                      generation using Gemini API.",
        tech: &["Python", "Gemini API", "NLP", "OCR"],
        highlights: &["ATS optimization", "Skill matching", "Interview questions"],
    },
    Project {
        title: "LLM Resume Parser",
        description: "Locally hosted LLM solution for structured resume data extraction with \
                      robust error handling.",
        tech: &["Python", "LLM", "JSON", "API"],
        highlights: &["Local hosting", "Rate limiting", "Structured output"],
    },
];

pub const PROJECTS_LINK: &str = "https://github.com/BBopanna03";

pub const CONTACT_BLURB: &str =
    "Ready to collaborate on innovative AI solutions? Let's build something amazing together.";

pub const CONTACT: &[ContactLink] = &[
    ContactLink {
        label: "Email",
        caption: "bharathmanjunath03@gmail.com",
        href: "mailto:bharathmanjunath03@gmail.com",
    },
    ContactLink {
        label: "GitHub",
        caption: "View Projects",
        href: "https://github.com/BBopanna03",
    },
    ContactLink {
        label: "LinkedIn",
        caption: "Professional Network",
        href: "https://www.linkedin.com/in/bharathmanjunath98/",
    },
];

pub const FOOTER: &str = "© 2025 Bharath M. Crafted with passion and powered by innovation.";

/// One line per section, for the startup log.
pub fn outline() -> Vec<String> {
    let mut lines = vec![
        format!("{}: {}", PROFILE.name, PROFILE.role),
        format!("  {}", PROFILE.tagline),
        format!(
            "  nav: {}",
            NAV.iter().map(NavItem::anchor).collect::<Vec<_>>().join(" ")
        ),
        format!(
            "  about: {} paragraphs, {} highlights",
            ABOUT.paragraphs.len(),
            ABOUT.highlights.len()
        ),
    ];
    lines.extend(
        SKILLS
            .iter()
            .enumerate()
            .map(|(i, c)| format!("  [{}] {} ({} skills)", i + 1, c.name, c.skills.len())),
    );
    lines.extend(PROJECTS.iter().map(|p| format!("  project: {}", p.title)));
    lines.extend(CONTACT.iter().map(|c| format!("  contact: {} -> {}", c.label, c.href)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_anchors_are_lowercase_section_ids() {
        let anchors: Vec<_> = NAV.iter().map(NavItem::anchor).collect();
        assert_eq!(anchors, ["#about", "#skills", "#projects", "#contact"]);
    }

    #[test]
    fn four_skill_categories() {
        assert_eq!(SKILLS.len(), 4);
        assert_eq!(SKILLS[0].skills.len(), 8);
        assert_eq!(SKILLS[3].skills, &["Python", "Java", "C"]);
    }

    #[test]
    fn projects_have_tech_and_highlights() {
        assert_eq!(PROJECTS.len(), 3);
        assert!(PROJECTS.iter().all(|p| !p.tech.is_empty() && p.highlights.len() == 3));
    }

    #[test]
    fn email_contact_matches_profile() {
        let email = CONTACT.iter().find(|c| c.label == "Email").unwrap();
        assert_eq!(email.href, format!("mailto:{}", PROFILE.email));
    }

    #[test]
    fn outline_lists_every_card_by_key() {
        let outline = outline();
        assert!(outline.iter().any(|l| l.contains("[4] Programming Languages")));
        assert_eq!(outline.iter().filter(|l| l.contains("project:")).count(), 3);
    }
}
