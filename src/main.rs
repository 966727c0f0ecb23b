use pdf_pager::{text, Renderer, RenderSummary, DEFAULT_OUTPUT};
use std::process::ExitCode;

fn run() -> pdf_pager::Result<RenderSummary> {
    let lines = text::split_lines(text::PAYMENT_GATEWAY_OVERVIEW);
    Renderer::default()
        .with_default_title(text::PAYMENT_GATEWAY_OVERVIEW_TITLE)
        .render_to_path(&lines, DEFAULT_OUTPUT)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(summary) => {
            println!("PDF generated at {}", summary.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
