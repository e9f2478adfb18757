//! Published Frames
//!
//! What a rendering consumer receives after a tick that changed the grid: the
//! cell buffer and the transform needed to sample it from world space.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::CellState;
use crate::mapping::MappingParams;

/// Borrowed view of the grid at the end of a tick.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GridFrame<'a> {
    pub tick: u64,
    pub mapping: MappingParams,
    pub cells: &'a [CellState],
}

impl GridFrame<'_> {
    pub fn to_recorded(&self) -> RecordedFrame {
        RecordedFrame {
            tick: self.tick,
            mapping: self.mapping,
            cells: self.cells.to_vec(),
        }
    }
}

/// Receives frames from [`FogOfWar::tick`](crate::FogOfWar::tick).
pub trait GridSink {
    fn publish(&mut self, frame: &GridFrame<'_>);
}

/// Discards every frame.
impl GridSink for () {
    fn publish(&mut self, _frame: &GridFrame<'_>) {}
}

/// Owned copy of a published frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub tick: u64,
    pub mapping: MappingParams,
    pub cells: Vec<CellState>,
}

impl RecordedFrame {
    pub fn get(&self, x: u32, y: u32) -> Option<CellState> {
        let res = self.mapping.resolution;
        if x >= res || y >= res {
            return None;
        }
        self.cells.get(y as usize * res as usize + x as usize).copied()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| **c == state).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Keeps published frames in memory, optionally only the most recent
/// `capacity` of them.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    frames: VecDeque<RecordedFrame>,
    capacity: Option<usize>,
    total_published: u64,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
            total_published: 0,
        }
    }

    /// Buffered frames, oldest first.
    pub fn frames(&self) -> &VecDeque<RecordedFrame> {
        &self.frames
    }

    pub fn latest(&self) -> Option<&RecordedFrame> {
        self.frames.back()
    }

    /// Frames published since creation, including evicted ones.
    pub fn total_published(&self) -> u64 {
        self.total_published
    }

    /// Removes and returns the buffered frames.
    pub fn drain(&mut self) -> Vec<RecordedFrame> {
        self.frames.drain(..).collect()
    }
}

impl GridSink for FrameRecorder {
    fn publish(&mut self, frame: &GridFrame<'_>) {
        self.total_published += 1;
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            while self.frames.len() >= capacity {
                self.frames.pop_front();
            }
        }
        self.frames.push_back(frame.to_recorded());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::WorldPoint;

    fn params() -> MappingParams {
        MappingParams {
            resolution: 2,
            scale: 0.5,
            offset: WorldPoint::new(0.5, 0.5),
        }
    }

    #[test]
    fn test_recorder_keeps_frames() {
        let cells = [
            CellState::Visible,
            CellState::Unexplored,
            CellState::Explored,
            CellState::Unexplored,
        ];
        let mut recorder = FrameRecorder::new();

        recorder.publish(&GridFrame {
            tick: 3,
            mapping: params(),
            cells: &cells,
        });

        let latest = recorder.latest().unwrap();
        assert_eq!(latest.tick, 3);
        assert_eq!(latest.get(0, 0), Some(CellState::Visible));
        assert_eq!(latest.get(0, 1), Some(CellState::Explored));
        assert_eq!(latest.get(2, 0), None);
        assert_eq!(latest.count(CellState::Unexplored), 2);
    }

    #[test]
    fn test_recorder_capacity_evicts_oldest() {
        let cells = [CellState::Unexplored; 4];
        let mut recorder = FrameRecorder::with_capacity(2);

        for tick in 1..=3 {
            recorder.publish(&GridFrame {
                tick,
                mapping: params(),
                cells: &cells,
            });
        }

        let ticks: Vec<u64> = recorder.frames().iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![2, 3]);
        assert_eq!(recorder.total_published(), 3);
        assert_eq!(recorder.drain().len(), 2);
        assert!(recorder.frames().is_empty());
    }

    #[test]
    fn test_full_recorder_keeps_rolling() {
        let cells = [CellState::Unexplored; 4];
        let mut recorder = FrameRecorder::with_capacity(3);

        for tick in 1..=100 {
            recorder.publish(&GridFrame {
                tick,
                mapping: params(),
                cells: &cells,
            });
        }

        let ticks: Vec<u64> = recorder.frames().iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![98, 99, 100]);
        assert_eq!(recorder.latest().map(|f| f.tick), Some(100));
        assert_eq!(recorder.total_published(), 100);
    }

    #[test]
    fn test_frame_json_uses_snake_case_states() {
        let cells = [CellState::Visible, CellState::Explored, CellState::Unexplored, CellState::Unexplored];
        let frame = GridFrame {
            tick: 1,
            mapping: params(),
            cells: &cells,
        }
        .to_recorded();

        let json = frame.to_json().unwrap();
        assert!(json.contains(r#""cells":["visible","explored","unexplored","unexplored"]"#));

        let parsed: RecordedFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, frame);
    }
}
