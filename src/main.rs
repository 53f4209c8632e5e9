mod app;
mod i18n;
mod settings;
mod upload;

use anyhow::Context;
use app::RegisterScreen;
use eframe::CreationContext;
use i18n::Catalog;
use tracing_subscriber::EnvFilter;
use upload::RegistrationClient;

fn main() -> anyhow::Result<()> {
    let settings = settings::load_settings()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalog = match &settings.translations_path {
        Some(path) => match Catalog::load(path) {
            Ok(catalog) if catalog.is_empty() => {
                tracing::warn!(path = %path.display(), "translation file has no entries");
                catalog
            }
            Ok(catalog) => {
                tracing::info!(path = %path.display(), entries = catalog.len(), "loaded translations");
                catalog
            }
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "using built-in texts");
                Catalog::default()
            }
        },
        None => Catalog::default(),
    };

    let client = RegistrationClient::new(&settings).context("failed to build HTTP client")?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([420.0, 640.0])
            .with_min_inner_size([360.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "QR Registration",
        options,
        Box::new(move |cc: &CreationContext| -> Box<dyn eframe::App> {
            Box::new(RegisterScreen::new(cc, &settings, catalog, client))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to run registration window: {e}"))
}
