mod shell;

use scribe_engine::BackendSettings;

fn main() -> anyhow::Result<()> {
    engine_logging::initialize(log::LevelFilter::Info);

    let mut settings = BackendSettings::default();
    if let Some(base_url) = std::env::args().nth(1) {
        settings.base_url = base_url;
    }
    shell::run(settings)
}
