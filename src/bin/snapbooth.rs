use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "snapbooth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a template JSON file and print its layout.
    Validate(ValidateArgs),
    /// Print the default slot assignment for a photo count.
    Autofill(AutofillArgs),
    /// Composite photos into a template and write PNG or JPEG.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,
}

#[derive(Parser, Debug)]
struct AutofillArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Number of captured photos.
    #[arg(long)]
    photos: usize,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Template JSON. A relative `imageUrl` resolves against its directory.
    #[arg(long)]
    template: PathBuf,

    /// Captured photos in take order.
    #[arg(long = "photo", required = true)]
    photos: Vec<PathBuf>,

    /// Manual assignment `SLOT=INDEX`, applied after moves. Repeatable.
    #[arg(long = "assign", value_parser = parse_assign)]
    assigns: Vec<(String, usize)>,

    /// Move a photo `FROM:TO` before assignments. Repeatable.
    #[arg(long = "move", value_parser = parse_move)]
    moves: Vec<(usize, usize)>,

    /// Booth configuration JSON (`SNAPBOOTH_*` variables override it).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path; `.png`, `.jpg` or `.jpeg`.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Autofill(args) => cmd_autofill(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn parse_assign(s: &str) -> Result<(String, usize), String> {
    let (slot, idx) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SLOT=INDEX, got '{s}'"))?;
    let idx = idx
        .trim()
        .parse()
        .map_err(|e| format!("bad photo index in '{s}': {e}"))?;
    Ok((slot.trim().to_string(), idx))
}

fn parse_move(s: &str) -> Result<(usize, usize), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("bad index in '{s}': {e}"))
    };
    Ok((parse(from)?, parse(to)?))
}

fn load_template(path: &Path) -> anyhow::Result<snapbooth::Template> {
    snapbooth::Template::from_path(path)
        .with_context(|| format!("load template '{}'", path.display()))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let t = load_template(&args.template)?;
    println!(
        "{} '{}': {}x{}, {} slots ({} top), expects {} photos, overlay {}",
        t.id,
        t.name,
        t.layout.width,
        t.layout.height,
        t.layout.slots.len(),
        t.layout
            .slots
            .iter()
            .filter(|s| s.layer_order == snapbooth::LayerOrder::Top)
            .count(),
        t.layout.expected_photo_count(),
        t.image_url.as_deref().unwrap_or("none"),
    );
    Ok(())
}

fn cmd_autofill(args: AutofillArgs) -> anyhow::Result<()> {
    let t = load_template(&args.template)?;
    let map = snapbooth::auto_assign(&t.layout, args.photos);
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    use snapbooth::{Action, BoothStep, ImageSource};

    let config = snapbooth::BoothConfig::load(args.config.as_deref())?;
    let template = load_template(&args.template)?;
    let cwd = std::env::current_dir().context("resolve current directory")?;

    let mut state = snapbooth::SessionState::new(config.photos_per_session)
        .reduce(Action::SetTemplate(Arc::new(template)))?
        .reduce(Action::SetStep(BoothStep::Camera))?;
    for photo in &args.photos {
        state = state.reduce(Action::AddPhoto(ImageSource::Path(cwd.join(photo))))?;
    }
    state = state.reduce(Action::FinishCapture)?;
    for (from, to) in args.moves {
        state = state.reduce(Action::ReorderPhotos { from, to })?;
    }
    for (slot_id, photo_index) in args.assigns {
        state = state.reduce(Action::AssignSlot {
            slot_id,
            photo_index,
        })?;
    }

    let assets_root = args.template.parent().unwrap_or_else(|| Path::new("."));
    let decoder = snapbooth::FsImageDecoder::new(assets_root);
    let out = match snapbooth::render_session(&state, &decoder, &config) {
        Ok(out) => out,
        Err(err) if err.is_session_fatal() => {
            return Err(anyhow::Error::new(err).context("session has nothing to composite"));
        }
        Err(err) => return Err(err.into()),
    };
    snapbooth::save(&out.frame, &args.out, config.jpeg_quality)?;
    state = state
        .reduce(Action::SetStep(BoothStep::Result))?
        .reduce(Action::IncrementSessionCount)?;

    println!("{}", serde_json::to_string_pretty(&out.summary)?);
    eprintln!(
        "wrote {} (session {}, slots per photo {:?})",
        args.out.display(),
        state.session_count,
        state.assignments.usage_counts(state.capture.len())
    );
    Ok(())
}
