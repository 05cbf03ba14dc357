use clap::{Parser, Subcommand};
use picasso_proxy::client::store::{extension_for, DirImageStore, MemoryImageStore};
use picasso_proxy::client::transport::HttpProxyTransport;
use picasso_proxy::{ClientController, ClientState, Config};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "picassoctl", about = "Terminal client for the Picasso image proxy", version)]
struct Cli {
    /// Override PROXY_URL
    #[arg(global = true, long)]
    proxy_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a single image and save it
    Generate {
        /// Text describing the desired image
        #[arg(long, value_name = "TEXT")]
        prompt: String,
        /// Output path (defaults to ./picasso.<ext>)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Type prompts line by line; `:another` resets, `:quit` exits
    Interactive {
        /// Directory holding the current image
        #[arg(long, value_name = "PATH", default_value = "generated")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load env and parse CLI
    Config::dotenv_load();
    picasso_proxy::init_tracing();
    let cli = Cli::parse();

    let mut conf = Config::new();
    if let Some(url) = cli.proxy_url {
        conf.proxy_url = url;
    }
    let transport = HttpProxyTransport::new(&conf.proxy_url);

    match cli.command {
        Commands::Generate { prompt, out } => {
            let mut controller = ClientController::new(transport, MemoryImageStore::new());
            controller.set_prompt(prompt);
            match controller.submit().await.clone() {
                ClientState::Success(handle) => {
                    let Some(image) = controller.store().get(&handle) else {
                        return Err("generated image is no longer available".into());
                    };
                    let path = out.unwrap_or_else(|| {
                        PathBuf::from(format!("picasso.{}", extension_for(&handle.content_type)))
                    });
                    tokio::fs::write(&path, &image.bytes).await?;
                    println!("Saved {} ({} bytes, {})", path.display(), handle.size, handle.content_type);
                    Ok(())
                }
                ClientState::Error(message) => {
                    eprintln!("Error: {}", message);
                    std::process::exit(1);
                }
                other => Err(format!("unexpected client state: {:?}", other).into()),
            }
        }
        Commands::Interactive { dir } => {
            let mut controller = ClientController::new(transport, DirImageStore::new(dir));
            run_interactive(&mut controller).await
        }
    }
}

async fn run_interactive(
    controller: &mut ClientController<HttpProxyTransport, DirImageStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Picasso - describe an image and press Enter (:another, :quit)");
    println!("Images are written to {}", controller.store().dir().display());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":another" => {
                if controller.reset() {
                    println!("Ready for a new prompt.");
                } else {
                    println!("Nothing to reset yet.");
                }
                continue;
            }
            _ => {}
        }

        controller.set_prompt(line);
        if controller.can_submit() {
            println!("Generating...");
        }
        match controller.submit().await.clone() {
            ClientState::Success(handle) => {
                println!("Image: {} ({} bytes, {})", handle.location, handle.size, handle.content_type);
                println!("Prompt: \"{}\"", controller.prompt().trim());
            }
            ClientState::Error(message) => eprintln!("Error: {}", message),
            ClientState::Idle | ClientState::Loading => {}
        }
    }

    Ok(())
}
