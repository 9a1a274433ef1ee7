use kiosk_printer::{NetworkPrinter, RasterOptions};
use kiosk_server::{
    AudioCache, Config, PrintedSetStore, QrClient, QueueMonitor, SpeechClient, StatusClient,
    TicketComposer, TicketPrintService, logger, ticket,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logger::init_logger();

    tracing::info!("Queue kiosk server starting...");

    let config = Config::from_env();
    std::fs::create_dir_all(config.audio_dir())?;
    std::fs::create_dir_all(config.print_dir())?;

    let font = ticket::load_ticket_font(config.ticket_font.as_deref())?;
    let qr = QrClient::new(&config.qr_service_url, &config.qr_url_template)?;
    let composer = TicketComposer::new(qr, font, config.background_path(), config.print_dir());

    let printer = NetworkPrinter::new(&config.printer_ip, 9100)?;
    let raster_opts = RasterOptions {
        dot_width: config.printer_max_dots,
        threshold: config.print_threshold,
    };
    let print_service = TicketPrintService::new(
        composer,
        printer,
        raster_opts,
        config.print_copies,
        config.print_dir(),
    );

    let speech = SpeechClient::new(&config.tts_url)?;
    let audio = AudioCache::new(config.audio_dir(), speech);
    let store = Arc::new(PrintedSetStore::open(config.printed_log())?);
    let status = StatusClient::new(&config.status_url)?;

    let monitor = QueueMonitor::new(
        status,
        print_service,
        audio,
        store,
        Duration::from_secs(config.poll_interval_secs),
    );

    let shutdown = CancellationToken::new();
    let monitor_handle = tokio::spawn(monitor.run(shutdown.clone()));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    shutdown.cancel();
    monitor_handle.await?;

    tracing::info!("Queue kiosk server stopped");
    Ok(())
}
