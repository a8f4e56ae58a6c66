mod demo;

use cmdbind::Presenter;
use cmdbind::RunOutcome;
use cmdbind::Settings;
use cmdbind::create_presenter;
use cmdbind::telemetry::init_tracing;
use cmdbind_common::Colors;
use cmdbind_common::color_init;

fn main() {
    let settings = Settings::from_env();
    color_init(settings.no_color);
    let telemetry = init_tracing(&settings);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{} failed to start runtime: {}", Colors::error("Error:"), e);
            std::process::exit(70); // EX_SOFTWARE
        }
    };

    let code = runtime.block_on(run(settings));
    drop(telemetry);
    std::process::exit(code);
}

async fn run(settings: Settings) -> i32 {
    let cli = match demo::build_cli(create_presenter(settings.output)) {
        Ok(cli) => cli,
        Err(e) => {
            create_presenter(settings.output).present_error(&e);
            return e.exit_code();
        }
    };

    match cli.run(std::env::args_os()).await {
        Ok(RunOutcome::Dispatched(response)) => {
            cli.presenter().present_response(&response);
            0
        }
        Ok(RunOutcome::HelpDisplayed) => 0,
        Err(e) => {
            cli.presenter().present_error(&e);
            e.exit_code()
        }
    }
}
