use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "waterline-preview",
    about = "Render the water surface offscreen and save PNG frames",
    version
)]
pub struct Cli {
    /// Output PNG. With more than one frame a zero-padded index is appended to the stem.
    #[arg(short, long, default_value = "water.png")]
    pub output: PathBuf,

    #[arg(long, default_value_t = 640)]
    pub width: u32,

    #[arg(long, default_value_t = 360)]
    pub height: u32,

    /// Number of frames to render
    #[arg(short, long, default_value_t = 1)]
    pub frames: u32,

    /// Frames per second of animation time between consecutive frames
    #[arg(long, default_value_t = 30.0)]
    pub fps: f32,

    /// Animation time of the first frame, in seconds
    #[arg(short, long, default_value_t = 2.0)]
    pub time: f32,

    /// Absorption density (higher is murkier)
    #[arg(long)]
    pub density: Option<f32>,

    /// Wave amplitude in world units
    #[arg(long)]
    pub wave_height: Option<f32>,

    /// Tiles along each side of the water grid
    #[arg(long)]
    pub tiles: Option<u32>,
}

impl Cli {
    /// Path for frame `index`.
    pub fn frame_path(&self, index: u32) -> PathBuf {
        if self.frames <= 1 {
            return self.output.clone();
        }
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "water".into());
        self.output.with_file_name(format!("{stem}_{index:04}.png"))
    }
}
