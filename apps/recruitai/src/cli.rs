use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::client::drop_zone::DragEvent;
use crate::client::files::SelectedFile;
use crate::client::progress::STAGE_LABELS;
use crate::client::{HttpScreeningApi, ScreeningForm};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::ranking::LlmRanker;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "recruitai")]
#[command(about = "AI résumé screening service and form client")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the screening HTTP service.
    Serve {},
    /// Submit a job description and résumés to a running service.
    Screen {
        #[arg(long)]
        jd: PathBuf,
        /// Repeat for each résumé.
        #[arg(long = "resume", required = true)]
        resumes: Vec<PathBuf>,
        #[arg(long, default_value = "")]
        instructions: String,
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        server: String,
        /// Write the rendered results as HTML.
        #[arg(long)]
        html: Option<PathBuf>,
        /// Directory for the plain-text ranking report.
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
}

pub async fn dispatch(args: Args, config: Config) -> Result<()> {
    match args.cmd {
        Command::Serve {} => serve(config).await,
        Command::Screen {
            jd,
            resumes,
            instructions,
            server,
            html,
            export_dir,
        } => {
            screen(
                &jd,
                &resumes,
                &instructions,
                &server,
                html.as_deref(),
                export_dir.as_deref(),
            )
            .await
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting RecruitAI v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.ai_api_key.clone(), &config.ai_model_name)?;
    info!(
        "LLM client initialized (provider: {:?}, model: {})",
        llm.provider(),
        llm.model()
    );
    if config.ai_api_key.is_none() {
        warn!("AI_API_KEY is not set; screening requests will fail until it is configured");
    }

    let state = AppState {
        config: config.clone(),
        ranker: Arc::new(LlmRanker(llm)),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn screen(
    jd: &Path,
    resumes: &[PathBuf],
    instructions: &str,
    server: &str,
    html: Option<&Path>,
    export_dir: Option<&Path>,
) -> Result<()> {
    let api = HttpScreeningApi::new(server).context("building HTTP client")?;
    info!("Screening against {}", api.endpoint());

    let mut form = ScreeningForm::new(Arc::new(api));
    form.jd_drag(DragEvent::Drop(vec![SelectedFile::from_path(jd).await?]));

    let mut files = Vec::with_capacity(resumes.len());
    for path in resumes {
        files.push(SelectedFile::from_path(path).await?);
    }
    form.resume_drag(DragEvent::Drop(files));
    if let Some(message) = form.toast().visible_message() {
        warn!("{message}");
    }
    form.set_instructions(instructions);
    if instructions.chars().count() > form.instructions().len() {
        warn!("Special instructions truncated to {}", form.instructions().counter_label());
    }

    let mut progress = form.subscribe_progress();
    let progress_log = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let stage = progress.borrow_and_update().active_stage();
            if let Some(stage) = stage {
                info!("[{}/{}] {}", stage + 1, STAGE_LABELS.len(), STAGE_LABELS[stage]);
            }
        }
    });

    let outcome = form.submit().await;
    progress_log.abort();

    if let Err(e) = outcome {
        bail!("Screening failed: {e}");
    }

    form.next_frame();
    let Some(view) = form.results_view() else {
        bail!("Screening returned no results view");
    };

    println!("{}", view.subtitle);
    for card in &view.cards {
        println!(
            "{:>4}  {:<30} {:>3}/100  {}",
            card.rank.marker, card.name, card.score, card.recommendation
        );
    }

    if let Some(path) = html {
        tokio::fs::write(path, view.render().to_html())
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Results written to {}", path.display());
    }

    if let Some(dir) = export_dir {
        if let Some(report) = form.export() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
            let path = dir.join(&report.filename);
            tokio::fs::write(&path, report.contents)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Report exported to {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_args_collect_repeated_resumes() {
        let args = Args::try_parse_from([
            "recruitai",
            "screen",
            "--jd",
            "jd.txt",
            "--resume",
            "a.pdf",
            "--resume",
            "b.docx",
        ])
        .unwrap();
        let Command::Screen {
            resumes, server, ..
        } = args.cmd
        else {
            panic!("expected screen");
        };
        assert_eq!(resumes, vec![PathBuf::from("a.pdf"), PathBuf::from("b.docx")]);
        assert_eq!(server, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_screen_requires_a_resume() {
        assert!(Args::try_parse_from(["recruitai", "screen", "--jd", "jd.txt"]).is_err());
    }
}
