use daihinmin_core::config::SessionConfig;
use daihinmin_core::coordinator::run_session;
use daihinmin_core::journal::Journal;

/// Minimal host binary: build a `SessionConfig` and hand it to the coordinator. Argument
/// parsing, YAML config loading, and log subscriber wiring are explicitly out of scope for
/// this crate family (see `daihinmin-core`'s design notes) — a real front end would replace
/// this `main` with one that builds the same `SessionConfig` from flags/files.
fn main() {
    tracing_subscriber::fmt::init();

    let config = SessionConfig::default();
    let journal = Journal::new(std::io::stdout().lock());

    if let Err(err) = run_session(config, journal) {
        eprintln!("session aborted: {err}");
        std::process::exit(1);
    }
}
