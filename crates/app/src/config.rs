//! Command-line configuration.
//!
//! Accepted flags:
//!   --size=WxH            screen size in pixels (default 1920x1080)
//!   --resize=WxH          resize the window after flying, before clicking
//!   --board=WxH           board cells (default 10x10)
//!   --mines=N             mine count (default 10)
//!   --seed=N              board seed (default: random)
//!   --cell-size=F         world units per cell (default 1.0)
//!   --aim=cursor|boresight
//!   --fly=KEYS:SECONDS    hold keys (e.g. W+A, SPACE) for a while; repeatable
//!   --click=X,Y[,left|right]  click a pixel; repeatable

use anyhow::{Context, Result, anyhow, bail};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aim {
    Cursor,
    Boresight,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlyStep {
    pub keys: Vec<KeyCode>,
    pub seconds: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Click {
    pub x: f32,
    pub y: f32,
    pub button: MouseButton,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub width: u32,
    pub height: u32,
    pub board_x: u32,
    pub board_y: u32,
    pub mines: u32,
    pub seed: Option<u64>,
    pub cell_size: f32,
    pub aim: Aim,
    pub resize: Option<(u32, u32)>,
    pub fly: Vec<FlyStep>,
    pub clicks: Vec<Click>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            board_x: 10,
            board_y: 10,
            mines: 10,
            seed: None,
            cell_size: 1.0,
            aim: Aim::Cursor,
            resize: None,
            fly: Vec::new(),
            clicks: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            if let Some(v) = arg.strip_prefix("--size=") {
                (cfg.width, cfg.height) = parse_dims(v).context("--size")?;
            } else if let Some(v) = arg.strip_prefix("--resize=") {
                cfg.resize = Some(parse_dims(v).context("--resize")?);
            } else if let Some(v) = arg.strip_prefix("--board=") {
                (cfg.board_x, cfg.board_y) = parse_dims(v).context("--board")?;
            } else if let Some(v) = arg.strip_prefix("--mines=") {
                cfg.mines = v.parse().with_context(|| format!("--mines: '{v}'"))?;
            } else if let Some(v) = arg.strip_prefix("--seed=") {
                cfg.seed = Some(v.parse().with_context(|| format!("--seed: '{v}'"))?);
            } else if let Some(v) = arg.strip_prefix("--cell-size=") {
                cfg.cell_size = v.parse().with_context(|| format!("--cell-size: '{v}'"))?;
            } else if let Some(v) = arg.strip_prefix("--aim=") {
                cfg.aim = match v.to_ascii_lowercase().as_str() {
                    "cursor" => Aim::Cursor,
                    "boresight" | "center" => Aim::Boresight,
                    other => bail!("--aim: unknown mode '{other}'"),
                };
            } else if let Some(v) = arg.strip_prefix("--fly=") {
                cfg.fly.push(parse_fly(v).context("--fly")?);
            } else if let Some(v) = arg.strip_prefix("--click=") {
                cfg.clicks.push(parse_click(v).context("--click")?);
            } else {
                log::warn!("Ignoring unknown argument '{arg}'");
            }
        }
        Ok(cfg)
    }
}

fn parse_dims(v: &str) -> Result<(u32, u32)> {
    let (a, b) = v
        .split_once('x')
        .or_else(|| v.split_once('X'))
        .ok_or_else(|| anyhow!("expected WxH, got '{v}'"))?;
    let (a, b): (u32, u32) = (a.parse()?, b.parse()?);
    if a == 0 || b == 0 {
        bail!("dimensions must be non-zero, got '{v}'");
    }
    Ok((a, b))
}

fn parse_fly(v: &str) -> Result<FlyStep> {
    let (keys, secs) = v
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("expected KEYS:SECONDS, got '{v}'"))?;
    let keys = keys
        .split('+')
        .map(|k| platform::parse_key(k).ok_or_else(|| anyhow!("unknown key '{k}'")))
        .collect::<Result<Vec<_>>>()?;
    let seconds: f32 = secs.parse().with_context(|| format!("bad duration '{secs}'"))?;
    if !(seconds >= 0.0 && seconds.is_finite()) {
        bail!("duration must be non-negative, got {seconds}");
    }
    Ok(FlyStep { keys, seconds })
}

fn parse_click(v: &str) -> Result<Click> {
    let mut parts = v.split(',');
    let x: f32 = parts
        .next()
        .ok_or_else(|| anyhow!("missing x"))?
        .trim()
        .parse()?;
    let y: f32 = parts
        .next()
        .ok_or_else(|| anyhow!("missing y in '{v}'"))?
        .trim()
        .parse()?;
    let button = match parts.next().map(|b| b.trim().to_ascii_lowercase()) {
        None => MouseButton::Left,
        Some(b) if b == "left" => MouseButton::Left,
        Some(b) if b == "right" => MouseButton::Right,
        Some(b) => bail!("unknown button '{b}'"),
    };
    Ok(Click { x, y, button })
}
