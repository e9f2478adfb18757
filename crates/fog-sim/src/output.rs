//! Frame Output
//!
//! Writes published frames as JSON Lines and renders them as text for quick
//! terminal previews.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use fog_core::{CellState, RecordedFrame};

use crate::error::SimError;

/// Appends one JSON object per frame to a file.
pub struct FrameWriter {
    writer: BufWriter<File>,
    written: u64,
}

impl FrameWriter {
    /// Creates (or truncates) `path`, creating parent directories as needed.
    pub fn create(path: &Path) -> Result<Self, SimError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &RecordedFrame) -> Result<(), SimError> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> Result<u64, SimError> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

/// Reads frames written by [`FrameWriter`]. Every frame must carry exactly
/// `resolution²` cells.
pub fn read_frames(path: &Path) -> Result<Vec<RecordedFrame>, SimError> {
    let content = fs::read_to_string(path)?;
    let mut frames = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let frame: RecordedFrame = serde_json::from_str(line)?;
        let res = frame.mapping.resolution as usize;
        let expected = res.saturating_mul(res);
        if frame.cells.len() != expected {
            return Err(SimError::MalformedFrame {
                line: index + 1,
                cells: frame.cells.len(),
                expected,
            });
        }
        frames.push(frame);
    }
    Ok(frames)
}

fn glyph(state: CellState) -> char {
    match state {
        CellState::Unexplored => ' ',
        CellState::Explored => '.',
        CellState::Visible => '#',
    }
}

/// Renders a frame with +y pointing up: the last grid row is printed first.
/// Cells missing from a short buffer render as unexplored.
pub fn render_ascii(frame: &RecordedFrame) -> String {
    let res = frame.mapping.resolution;
    let mut out = String::new();
    for y in (0..res).rev() {
        out.extend((0..res).map(|x| glyph(frame.get(x, y).unwrap_or_default())));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_core::{MappingParams, WorldPoint};
    use tempfile::tempdir;

    fn frame(tick: u64, cells: Vec<CellState>) -> RecordedFrame {
        RecordedFrame {
            tick,
            mapping: MappingParams {
                resolution: 2,
                scale: 0.5,
                offset: WorldPoint::new(0.5, 0.5),
            },
            cells,
        }
    }

    #[test]
    fn test_render_ascii_flips_rows() {
        let f = frame(
            0,
            vec![
                CellState::Visible,
                CellState::Unexplored,
                CellState::Explored,
                CellState::Explored,
            ],
        );

        assert_eq!(render_ascii(&f), "..\n# \n");
    }

    #[test]
    fn test_write_and_read_frames() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("frames.jsonl");

        let mut writer = FrameWriter::create(&path).unwrap();
        writer.write_frame(&frame(1, vec![CellState::Visible; 4])).unwrap();
        writer.write_frame(&frame(2, vec![CellState::Explored; 4])).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        let frames = read_frames(&path).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].tick, 1);
        assert_eq!(frames[1].count(CellState::Explored), 4);
    }

    #[test]
    fn test_render_ascii_short_buffer() {
        let f = frame(0, vec![CellState::Visible]);

        assert_eq!(render_ascii(&f), "  \n# \n");
    }

    #[test]
    fn test_read_frames_rejects_wrong_cell_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");

        let mut writer = FrameWriter::create(&path).unwrap();
        writer.write_frame(&frame(1, vec![CellState::Visible; 4])).unwrap();
        writer.write_frame(&frame(2, vec![CellState::Visible; 3])).unwrap();
        writer.finish().unwrap();

        assert!(matches!(
            read_frames(&path),
            Err(SimError::MalformedFrame {
                line: 2,
                cells: 3,
                expected: 4
            })
        ));
    }
}
