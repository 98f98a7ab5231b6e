use anyhow::{Context, Result};
use crabirc::client::{Client, ClientHandle, Event};
use crabirc::config;
use crabirc::console::{display, Action, Console};
use crabirc::logging;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    // Config path from the first argument, else the platform config dir.
    let cfg = match std::env::args_os().nth(1) {
        Some(path) => config::load_config(Path::new(&path))?,
        None => config::load_default_config()?,
    };
    logging::init_tracing(&cfg.logging.level);

    let mut client = Client::new(&cfg);
    for name in display::WATCHED {
        client.on(name, print_event);
    }
    for name in display::WATCHED_CTCP {
        client.on_ctcp(name, print_event);
    }

    let handle = client.handle();
    let mut running = tokio::spawn(client.run());

    println!(
        "Connecting to {}:{} as {} (/help for commands)",
        cfg.server.host, cfg.server.port, cfg.server.nickname
    );

    // Spawn stdin reader task
    let input_handle = handle.clone();
    let mut console = Console::new(cfg.server.channels.first().cloned());
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            for action in console.plan(&line) {
                run_action(&input_handle, action);
            }
        }
        let _ = input_handle.quit(None);
    });

    tokio::select! {
        result = &mut running => result.context("client task failed")?,
        _ = tokio::signal::ctrl_c() => {
            let _ = handle.quit(Some("Interrupted"));
            running.await.context("client task failed")?;
        }
    }

    Ok(())
}

fn print_event(ev: &Event) -> Option<String> {
    if let Some(line) = display::describe(ev) {
        println!("{}", line);
    }
    None
}

fn run_action(handle: &ClientHandle, action: Action) {
    let result = match action {
        Action::Send(line) => handle.send_raw(&line),
        Action::SendLater { delay, line } => {
            handle.send_after(delay, line);
            println!("*** Scheduled in {}s.", delay.as_secs());
            Ok(())
        }
        Action::Quit { message } => handle.quit(message.as_deref()),
        Action::Print(text) => {
            println!("{}", text);
            Ok(())
        }
    };
    if let Err(e) = result {
        println!("!!! Send failed: {}", e);
    }
}
