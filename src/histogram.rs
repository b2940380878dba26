//! Rating histogram with ten unit-wide bins over 0..=10.

use crate::error::Result;
use crate::path_utils::{safe_parent_for_creation, sanitize_file_stem};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const BIN_COUNT: usize = 10;

const SVG_WIDTH: usize = 640;
const SVG_HEIGHT: usize = 400;
const MARGIN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingHistogram {
    counts: [usize; BIN_COUNT],
}

impl RatingHistogram {
    /// Bin `i` holds ratings in `[i, i + 1)`; a rating of 10 lands in the last bin.
    pub fn from_ratings(ratings: &[f64]) -> Self {
        let mut counts = [0; BIN_COUNT];
        for rating in ratings.iter().filter(|r| r.is_finite()) {
            let bin = rating.clamp(0.0, 10.0).floor() as usize;
            counts[bin.min(BIN_COUNT - 1)] += 1;
        }
        Self { counts }
    }

    pub fn counts(&self) -> &[usize; BIN_COUNT] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    fn bin_label(bin: usize) -> String {
        format!("{bin:>2}-{:<2}", bin + 1)
    }

    /// Horizontal bars, the longest spanning `width` cells.
    pub fn render_text(&self, width: usize) -> String {
        let max = self.max_count().max(1);
        let mut out = String::new();
        for (bin, &count) in self.counts.iter().enumerate() {
            let len = (count * width).div_ceil(max);
            let _ = writeln!(
                out,
                "{} | {}{}",
                Self::bin_label(bin),
                "█".repeat(len),
                if count > 0 {
                    format!(" {count}")
                } else {
                    String::new()
                }
            );
        }
        out
    }

    pub fn render_svg(&self, title: &str) -> String {
        let max = self.max_count().max(1);
        let plot_width = SVG_WIDTH - 2 * MARGIN;
        let plot_height = SVG_HEIGHT - 2 * MARGIN;
        let bar_width = plot_width / BIN_COUNT;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SVG_WIDTH}" height="{SVG_HEIGHT}" viewBox="0 0 {SVG_WIDTH} {SVG_HEIGHT}">"#
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="white"/>"#
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="18">{}</text>"#,
            SVG_WIDTH / 2,
            MARGIN / 2 + 6,
            crate::website::escape_html(title)
        );

        for (bin, &count) in self.counts.iter().enumerate() {
            let height = count * plot_height / max;
            let x = MARGIN + bin * bar_width;
            let y = MARGIN + plot_height - height;
            let _ = writeln!(
                svg,
                r#"  <rect x="{x}" y="{y}" width="{bar_width}" height="{height}" fill="skyblue" stroke="black"/>"#
            );
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="12">{bin}</text>"#,
                x,
                MARGIN + plot_height + 16
            );
            if count > 0 {
                let _ = writeln!(
                    svg,
                    r#"  <text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="12">{count}</text>"#,
                    x + bar_width / 2,
                    y.saturating_sub(4)
                );
            }
        }

        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{}" font-family="sans-serif" font-size="12">10</text>"#,
            MARGIN + plot_width - 6,
            MARGIN + plot_height + 16
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="14">Rating</text>"#,
            SVG_WIDTH / 2,
            SVG_HEIGHT - 10
        );
        let _ = writeln!(
            svg,
            r#"  <text x="15" y="{}" text-anchor="middle" font-family="sans-serif" font-size="14" transform="rotate(-90 15 {})">Frequency</text>"#,
            SVG_HEIGHT / 2,
            SVG_HEIGHT / 2
        );
        svg.push_str("</svg>\n");
        svg
    }

    /// Writes `<dir>/<name>.svg` and returns its path.
    pub fn save_svg(&self, dir: &Path, name: &str, title: &str) -> Result<PathBuf> {
        let path = dir.join(format!("{}.svg", sanitize_file_stem(name)));
        if let Some(parent) = safe_parent_for_creation(&path) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.render_svg(title))?;
        tracing::info!(path = %path.display(), "saved rating histogram");
        Ok(path)
    }
}
