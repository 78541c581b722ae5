//! Port inspection and management command, talking to a running daemon
//! over its IPC socket.

use crate::app::{OutputFormat, PortArgs, PortCommands};
use color_eyre::eyre::{eyre, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use dot1x_daemon::config::DaemonConfig;
use dot1x_daemon::ipc::{IpcClient, IpcRequest, IpcResponse};

/// Runs the port command.
pub async fn run(args: PortArgs, format: OutputFormat) -> Result<()> {
    let socket_path = args
        .socket
        .unwrap_or_else(|| DaemonConfig::default().ipc.socket_path);
    let mut client = IpcClient::new(socket_path);
    client
        .connect()
        .await
        .map_err(|_| eyre!("could not reach the daemon; is it running?"))?;

    match args.command {
        PortCommands::List => {
            match client.request(&IpcRequest::PortList).await? {
                IpcResponse::PortList { ports } => print_port_list(&ports, format),
                IpcResponse::Error { message } => return Err(eyre!(message)),
                _ => return Err(eyre!("unexpected response from daemon")),
            }
            Ok(())
        }
        PortCommands::Show { index } => {
            match client.request(&IpcRequest::PortShow { index }).await? {
                IpcResponse::PortInfo { data, .. } => print_json_or_text(&data, format),
                IpcResponse::Error { message } => return Err(eyre!(message)),
                _ => return Err(eyre!("unexpected response from daemon")),
            }
            Ok(())
        }
        PortCommands::Stats { index } => {
            match client.request(&IpcRequest::Stats { index }).await? {
                IpcResponse::Stats { data, .. } => print_json_or_text(&data, format),
                IpcResponse::Error { message } => return Err(eyre!(message)),
                _ => return Err(eyre!("unexpected response from daemon")),
            }
            Ok(())
        }
        PortCommands::Set {
            index,
            field,
            value,
            dry_run,
        } => {
            let request = IpcRequest::PortSet {
                index,
                field,
                value,
                commit: !dry_run,
            };
            match client.request(&request).await? {
                IpcResponse::Ok { message } => {
                    println!("{}", message.unwrap_or_default());
                    Ok(())
                }
                IpcResponse::Error { message } => Err(eyre!(message)),
                _ => Err(eyre!("unexpected response from daemon")),
            }
        }
    }
}

fn print_port_list(ports: &[(u32, bool)], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!(ports)),
        OutputFormat::Text => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["index", "authorized"]);
            for (index, authorized) in ports {
                table.add_row(vec![index.to_string(), authorized.to_string()]);
            }
            println!("{}", table);
        }
    }
}

fn print_json_or_text(data: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{data}"),
        OutputFormat::Text => match serde_json::from_str::<serde_json::Value>(data) {
            Ok(value) => println!("{}", serde_json::to_string_pretty(&value).unwrap_or(data.to_string())),
            Err(_) => println!("{data}"),
        },
    }
}
