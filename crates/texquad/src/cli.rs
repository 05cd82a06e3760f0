use std::path::PathBuf;

use clap::Parser;
use renderer::{FilterMode, WrapMode};

#[derive(Parser, Debug)]
#[command(
    name = "texquad",
    author,
    version,
    about = "Renders a textured quad through an OpenGL 3.3 shader pair"
)]
pub struct Args {
    /// Image file to texture the quad with; a generated checkerboard is used
    /// when omitted.
    #[arg(value_name = "TEXTURE")]
    pub texture: Option<PathBuf>,

    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Replace the built-in vertex shader with a GLSL file. Must consume
    /// attribute locations 0 (position), 1 (colour), and 2 (uv).
    #[arg(long, value_name = "PATH")]
    pub vert: Option<PathBuf>,

    /// Replace the built-in fragment shader with a GLSL file. The quad
    /// texture is bound to the `u_texture` sampler on unit 0.
    #[arg(long, value_name = "PATH")]
    pub frag: Option<PathBuf>,

    /// Texture wrap mode: `repeat`, `mirror`, or `clamp`.
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_wrap_mode,
        default_value = "repeat"
    )]
    pub wrap: WrapMode,

    /// Texture filter mode: `linear` or `nearest`.
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_filter_mode,
        default_value = "linear"
    )]
    pub filter: FilterMode,

    /// Background colour as comma-separated floats in 0..=1 (e.g. `0.2,0.3,0.3`).
    #[arg(long, value_name = "R,G,B", value_parser = parse_clear_color)]
    pub clear_color: Option<[f32; 3]>,

    /// Window title.
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Swap as fast as the driver allows instead of waiting for vblank.
    #[arg(long)]
    pub no_vsync: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

pub fn parse_surface_size(spec: &str) -> Result<(u32, u32), String> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WxH format, e.g. 1280x720".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in size specification '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in size specification '{trimmed}'"))?;

    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".to_string());
    }

    Ok((width, height))
}

pub fn parse_wrap_mode(value: &str) -> Result<WrapMode, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "repeat" => Ok(WrapMode::Repeat),
        "mirror" | "mirrored" | "mirrored-repeat" => Ok(WrapMode::MirroredRepeat),
        "clamp" | "clamp-to-edge" => Ok(WrapMode::ClampToEdge),
        other => Err(format!(
            "unknown wrap mode '{other}'; expected repeat, mirror, or clamp"
        )),
    }
}

pub fn parse_filter_mode(value: &str) -> Result<FilterMode, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "linear" => Ok(FilterMode::Linear),
        "nearest" | "pixel" => Ok(FilterMode::Nearest),
        other => Err(format!(
            "unknown filter mode '{other}'; expected linear or nearest"
        )),
    }
}

pub fn parse_clear_color(value: &str) -> Result<[f32; 3], String> {
    let components: Vec<&str> = value.split(',').map(str::trim).collect();
    if components.len() != 3 {
        return Err("expected three comma-separated components, e.g. 0.2,0.3,0.3".to_string());
    }

    let mut color = [0.0f32; 3];
    for (slot, component) in color.iter_mut().zip(&components) {
        let parsed: f32 = component
            .parse()
            .map_err(|_| format!("invalid colour component '{component}'"))?;
        if !(0.0..=1.0).contains(&parsed) {
            return Err(format!("colour component {parsed} outside 0..=1"));
        }
        *slot = parsed;
    }

    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_size_accepts_wxh() {
        assert_eq!(parse_surface_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_surface_size(" 640 X 480 "), Ok((640, 480)));
    }

    #[test]
    fn surface_size_rejects_zero_and_garbage() {
        assert!(parse_surface_size("0x720").is_err());
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("widexhigh").is_err());
    }

    #[test]
    fn wrap_mode_aliases_resolve() {
        assert_eq!(parse_wrap_mode("repeat"), Ok(WrapMode::Repeat));
        assert_eq!(parse_wrap_mode("MIRROR"), Ok(WrapMode::MirroredRepeat));
        assert_eq!(parse_wrap_mode("clamp-to-edge"), Ok(WrapMode::ClampToEdge));
        assert!(parse_wrap_mode("tile").is_err());
    }

    #[test]
    fn filter_mode_aliases_resolve() {
        assert_eq!(parse_filter_mode("linear"), Ok(FilterMode::Linear));
        assert_eq!(parse_filter_mode("pixel"), Ok(FilterMode::Nearest));
        assert!(parse_filter_mode("cubic").is_err());
    }

    #[test]
    fn clear_color_parses_three_components() {
        assert_eq!(parse_clear_color("0.2, 0.3,0.3"), Ok([0.2, 0.3, 0.3]));
        assert!(parse_clear_color("0.2,0.3").is_err());
        assert!(parse_clear_color("0.2,0.3,1.5").is_err());
        assert!(parse_clear_color("r,g,b").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
