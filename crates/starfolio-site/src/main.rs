use anyhow::Result;
use starfolio_backdrop::BackdropConfig;
use starfolio_engine::device::GpuInit;
use starfolio_engine::logging::{init_logging, LoggingConfig};
use starfolio_engine::window::{Runtime, RuntimeConfig};

use starfolio_site::content::{self, PROFILE};
use starfolio_site::PageShell;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    for line in content::outline() {
        log::info!("{line}");
    }
    log::info!("keys: 1-4 flip skill cards, Esc closes");

    let config = RuntimeConfig {
        title: format!("{} | {}", PROFILE.name, PROFILE.role),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), PageShell::new(BackdropConfig::default()))
}
