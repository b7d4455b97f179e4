use colorous::Gradient;
use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sequential color palettes, sampled from light (low values) to dark (high
/// values) except for the perceptual ones, which run dark to light
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Palette {
    Reds,
    Blues,
    Greens,
    Greys,
    Oranges,
    Purples,
    YlGn,
    YlOrRd,
    Viridis,
    Magma,
}

impl Palette {
    const ALL: [Palette; 10] = [
        Palette::Reds,
        Palette::Blues,
        Palette::Greens,
        Palette::Greys,
        Palette::Oranges,
        Palette::Purples,
        Palette::YlGn,
        Palette::YlOrRd,
        Palette::Viridis,
        Palette::Magma,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Palette::Reds => "Reds",
            Palette::Blues => "Blues",
            Palette::Greens => "Greens",
            Palette::Greys => "Greys",
            Palette::Oranges => "Oranges",
            Palette::Purples => "Purples",
            Palette::YlGn => "YlGn",
            Palette::YlOrRd => "YlOrRd",
            Palette::Viridis => "viridis",
            Palette::Magma => "magma",
        }
    }

    fn gradient(self) -> Gradient {
        match self {
            Palette::Reds => colorous::REDS,
            Palette::Blues => colorous::BLUES,
            Palette::Greens => colorous::GREENS,
            Palette::Greys => colorous::GREYS,
            Palette::Oranges => colorous::ORANGES,
            Palette::Purples => colorous::PURPLES,
            Palette::YlGn => colorous::YELLOW_GREEN,
            Palette::YlOrRd => colorous::YELLOW_ORANGE_RED,
            Palette::Viridis => colorous::VIRIDIS,
            Palette::Magma => colorous::MAGMA,
        }
    }
}

/// A palette, optionally reversed (written with an `_r` suffix)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Colormap {
    palette: Palette,
    reversed: bool,
}

impl Colormap {
    pub fn new(palette: Palette) -> Colormap {
        Colormap {
            palette,
            reversed: false,
        }
    }

    pub fn reversed(self) -> Colormap {
        Colormap {
            reversed: !self.reversed,
            ..self
        }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Color at position `t` along the map; `t` is clamped to `[0, 1]` and
    /// NaN maps to the low end.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };
        let color = self.palette.gradient().eval_continuous(t);
        Color::Rgb(color.r, color.g, color.b)
    }
}

impl Default for Colormap {
    fn default() -> Colormap {
        Colormap::new(Palette::Reds)
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.palette.name())?;
        if self.reversed {
            write!(f, "_r")?;
        }
        Ok(())
    }
}

impl FromStr for Colormap {
    type Err = ParseColormapError;

    fn from_str(s: &str) -> Result<Colormap, ParseColormapError> {
        let (name, reversed) = match s.strip_suffix("_r") {
            Some(name) => (name, true),
            None => (s, false),
        };
        let palette = Palette::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseColormapError(s.to_owned()))?;
        Ok(Colormap { palette, reversed })
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown color map {0:?}")]
pub struct ParseColormapError(String);

/// Maps data values linearly onto a color map between `vmin` and `vmax`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    cmap: Colormap,
    vmin: f64,
    vmax: f64,
}

impl ColorScale {
    pub fn new(cmap: Colormap, vmin: f64, vmax: f64) -> ColorScale {
        ColorScale { cmap, vmin, vmax }
    }

    /// Position of `value` between the bounds; a degenerate range maps
    /// everything to the low end
    pub fn normalize(&self, value: f64) -> f64 {
        if self.vmax > self.vmin {
            (value - self.vmin) / (self.vmax - self.vmin)
        } else {
            0.0
        }
    }

    pub fn color(&self, value: f64) -> Color {
        self.cmap.sample(self.normalize(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("Reds".parse::<Colormap>(), Ok(Colormap::new(Palette::Reds)));
        assert_eq!("ylgn".parse::<Colormap>(), Ok(Colormap::new(Palette::YlGn)));
        assert_eq!(
            "Blues_r".parse::<Colormap>(),
            Ok(Colormap::new(Palette::Blues).reversed())
        );
        assert!("Rainbows".parse::<Colormap>().is_err());
        assert_eq!(Colormap::new(Palette::Greys).reversed().to_string(), "Greys_r");
    }

    #[test]
    fn test_sample_ends() {
        let reds = Colormap::new(Palette::Reds);
        assert_eq!(reds.sample(0.0), Color::Rgb(0xff, 0xf5, 0xf0));
        assert_eq!(reds.sample(1.0), Color::Rgb(0x67, 0x00, 0x0d));
        assert_eq!(reds.sample(-3.0), reds.sample(0.0));
        assert_eq!(reds.sample(7.0), reds.sample(1.0));
        assert_eq!(reds.sample(f64::NAN), reds.sample(0.0));
        assert_eq!(reds.reversed().sample(0.0), reds.sample(1.0));
    }

    #[test]
    fn test_sample_interior() {
        assert_eq!(
            Colormap::new(Palette::Reds).sample(0.5),
            Color::Rgb(249, 104, 75)
        );
        assert_eq!(
            Colormap::new(Palette::YlGn).sample(0.1),
            Color::Rgb(246, 251, 195)
        );
        assert_eq!(
            Colormap::new(Palette::Viridis).sample(0.7),
            Color::Rgb(66, 190, 112)
        );
        let magma = Colormap::new(Palette::Magma);
        assert_eq!(magma.reversed().sample(0.25), magma.sample(0.75));
    }

    #[test]
    fn test_color_scale() {
        let scale = ColorScale::new(Colormap::new(Palette::Greys), 10.0, 20.0);
        assert_eq!(scale.normalize(15.0), 0.5);
        assert_eq!(scale.color(10.0), Color::Rgb(0xff, 0xff, 0xff));
        assert_eq!(scale.color(20.0), Color::Rgb(0, 0, 0));
        assert_eq!(scale.color(99.0), Color::Rgb(0, 0, 0));
        let flat = ColorScale::new(Colormap::new(Palette::Greys), 3.0, 3.0);
        assert_eq!(flat.color(3.0), Color::Rgb(0xff, 0xff, 0xff));
    }
}
