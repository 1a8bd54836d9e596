use std::env;

use anyhow::Result;

use shelfscan::catalog::DeviceCatalog;
use shelfscan::permissions::probe_permission;
use shelfscan::platform::{PlatformCatalog, PlatformStreamSource};
use shelfscan::stream::StreamHandle;
use shelfscan::{selection_plan, ResolutionProfile};

#[tokio::main]
async fn main() -> Result<()> {
    shelfscan::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: shelfscan-probe <command> [args]");
        eprintln!("Commands: list-devices [--json], permission, acquire [--hold]");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "list-devices" => cmd_list_devices(&args).await,
        "permission" => cmd_permission(),
        "acquire" => cmd_acquire(&args).await,
        other => {
            eprintln!("Unknown command: {}", other);
            std::process::exit(1);
        }
    }
}

async fn cmd_list_devices(args: &[String]) -> Result<()> {
    let devices = PlatformCatalog.list_devices().await?;
    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string(&devices)?);
    } else {
        for d in devices {
            println!("{}: {} (facing: {})", d.id, d.label, d.facing);
        }
    }
    Ok(())
}

fn cmd_permission() -> Result<()> {
    let info = probe_permission();
    println!("{}: {}", info.status, info.message);
    Ok(())
}

/// Walk the same acquisition plan the scan session uses, then release. With
/// --hold the stream stays open until Ctrl-C so the hardware indicator can
/// be checked by eye.
async fn cmd_acquire(args: &[String]) -> Result<()> {
    let devices = PlatformCatalog.list_devices().await?;
    let plan = selection_plan(&devices)?;

    let source = PlatformStreamSource::new(ResolutionProfile::High);
    let handle = StreamHandle::new();

    let mut last_err = None;
    for target in &plan {
        match handle.acquire(&source, target).await {
            Ok(()) => break,
            Err(e) => {
                eprintln!("acquisition failed on {}: {}", target, e);
                last_err = Some(e);
            }
        }
    }

    let device = match handle.device().await {
        Some(device) => device,
        None => {
            return Err(last_err
                .map(Into::into)
                .unwrap_or_else(|| anyhow::anyhow!("no acquisition attempted")));
        }
    };
    println!("acquired stream on {}: {}", device.id, device.label);

    if args.contains(&"--hold".to_string()) {
        let (tx, rx) = std::sync::mpsc::channel();
        ctrlc::set_handler(move || {
            let _ = tx.send(());
        })?;
        println!("Holding stream open; press Ctrl-C to release");
        let _ = rx.recv();
    }

    handle.release().await;
    println!("stream released");
    Ok(())
}
