use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "shaderdeck",
    author,
    version,
    about = "Shader demo deck",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Log filter directive (e.g. `debug` or `surface=trace`); overrides RUST_LOG.
    #[arg(long, value_name = "FILTER", global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the demos bundled with this build.
    List(ListArgs),
    /// Describe a demo's geometry, draw mode, and uniform bindings.
    Info(InfoArgs),
    /// Validate a demo definition without rendering anything.
    Check(CheckArgs),
    /// Render a demo against the in-memory context and audit resource cleanup.
    Soak(SoakArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON instead of the name/summary table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Demo to describe: a builtin name, `builtin://name`, or a pack directory.
    #[arg(value_name = "DEMO")]
    pub demo: String,

    /// Emit machine-readable JSON instead of the field listing.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Demo to validate: a builtin name, `builtin://name`, or a pack directory.
    #[arg(value_name = "DEMO")]
    pub demo: String,
}

#[derive(Parser, Debug)]
pub struct SoakArgs {
    /// Demo to render: a builtin name, `builtin://name`, or a pack directory.
    #[arg(value_name = "DEMO")]
    pub demo: String,

    /// Number of frames to schedule before tearing the session down.
    #[arg(long, value_name = "COUNT", default_value_t = 300)]
    pub frames: u64,

    /// Simulated surface size (e.g. `1280x720`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_surface_size,
        default_value = "800x600"
    )]
    pub size: (u32, u32),

    /// Sabotage the named pipeline stage: `vertex`, `fragment`, or `link`.
    #[arg(long, value_name = "STAGE", value_parser = parse_fail_stage)]
    pub fail_stage: Option<FailStage>,
}

/// Pipeline stage a soak run deliberately breaks to exercise teardown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailStage {
    Vertex,
    Fragment,
    Link,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT, e.g. 1280x720".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{trimmed}'"))?;

    if width == 0 || height == 0 {
        return Err("surface dimensions must be greater than zero".to_string());
    }

    Ok((width, height))
}

pub fn parse_fail_stage(value: &str) -> Result<FailStage, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("failure stage must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "vertex" | "vert" => Ok(FailStage::Vertex),
        "fragment" | "frag" => Ok(FailStage::Fragment),
        "link" => Ok(FailStage::Link),
        other => Err(format!(
            "unknown failure stage '{other}'; expected vertex, fragment, or link"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surface_size_variants() {
        assert_eq!(parse_surface_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size(" 640X360 ").unwrap(), (640, 360));
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("0x720").is_err());
        assert!(parse_surface_size("1280xabc").is_err());
    }

    #[test]
    fn parses_fail_stage_aliases() {
        assert_eq!(parse_fail_stage("vertex").unwrap(), FailStage::Vertex);
        assert_eq!(parse_fail_stage("FRAG").unwrap(), FailStage::Fragment);
        assert_eq!(parse_fail_stage(" link ").unwrap(), FailStage::Link);
        assert!(parse_fail_stage("geometry").is_err());
        assert!(parse_fail_stage("").is_err());
    }
}
