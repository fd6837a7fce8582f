use startmeeting::components::RunOutcome;
use startmeeting::startup;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting startmeeting");

    // Load configuration
    let config = startup::load_config()?;

    let result = startup::start(&config).await;

    match &result {
        Ok(RunOutcome::NoShift) => println!("No shift today"),
        Ok(RunOutcome::NoteWritten { path, members }) => println!(
            "Start meeting notes for {} members written to {}",
            members,
            path.display()
        ),
        Err(_) => {}
    }

    startup::pause_before_exit(&config).await;

    result.map(|_| ()).map_err(Into::into)
}
