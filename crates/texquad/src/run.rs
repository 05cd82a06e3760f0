use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use renderer::{Renderer, RendererConfig, ShaderSource, StageKind, TextureSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let config = build_config(args)?;
    info!(
        title = %config.title,
        width = config.surface_size.0,
        height = config.surface_size.1,
        "bootstrapping texquad"
    );

    Renderer::new(config).run()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_config(args: Args) -> Result<RendererConfig> {
    let mut config = RendererConfig::default();

    if let Some(size) = args.size {
        config.surface_size = size;
    }
    if let Some(title) = args.title {
        config.title = title;
    }
    if let Some(path) = args.texture {
        info!(path = %path.display(), "texturing quad from file");
        config.texture = TextureSource::File(path);
    }
    if let Some(path) = args.vert.as_deref() {
        config.vertex_source = load_shader_source(path, StageKind::Vertex)?;
    }
    if let Some(path) = args.frag.as_deref() {
        config.fragment_source = load_shader_source(path, StageKind::Fragment)?;
    }
    if let Some([r, g, b]) = args.clear_color {
        config.clear_color = [r, g, b, 1.0];
    }
    config.wrap = args.wrap;
    config.filter = args.filter;
    config.vsync = !args.no_vsync;

    Ok(config)
}

fn load_shader_source(path: &Path, stage: StageKind) -> Result<ShaderSource> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {stage} shader at {}", path.display()))?;
    Ok(match stage {
        StageKind::Vertex => ShaderSource::vertex(text),
        StageKind::Fragment => ShaderSource::fragment(text),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn shader_override_is_read_and_tagged() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "#version 330 core\nvoid main() {{}}\n").expect("write shader");

        let source = load_shader_source(file.path(), StageKind::Fragment).expect("load shader");
        assert_eq!(source.stage(), StageKind::Fragment);
        assert!(source.text().starts_with("#version 330 core"));
    }

    #[test]
    fn missing_shader_file_names_the_stage_and_path() {
        let err = load_shader_source(Path::new("/nonexistent/quad.vert"), StageKind::Vertex)
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("vertex"));
        assert!(message.contains("/nonexistent/quad.vert"));
    }
}
