//! Animation control stream.
//!
//! The payload starts with a NUL-terminated label and one reserved byte,
//! followed by packed little-endian records:
//!
//! | bytes | field                                   |
//! |-------|-----------------------------------------|
//! | 0..8  | `left`, `top`, `right`, `bottom` (i16)  |
//! | 8..12 | `origin_x`, `origin_y` (i16)            |
//! | 12    | `delay` in ticks (u8)                   |
//! | 13    | `action` (u8): 0 next, 1 loop, 2 stop   |
//!
//! Records are never split across chunks.

use crate::error::{Result, SheetError};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use serde::Serialize;
use std::io::{self, Write};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, warn};

pub const RECORD_SIZE: usize = 14;

/// Frame bounds; `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rect {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

impl Rect {
    pub fn width(&self) -> i32 {
        self.right as i32 - self.left as i32
    }

    pub fn height(&self) -> i32 {
        self.bottom as i32 - self.top as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Frame {
    /// Position within the owning animation, starting at 0.
    pub index: usize,
    pub rect: Rect,
    /// Anchor used when compositing.
    pub origin: Point,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Animation {
    /// One entry per displayed tick.
    pub frames: Vec<Arc<Frame>>,
    pub is_looping: bool,
    /// Action of the record that closed this animation.
    pub end_action: Action,
    /// Indices of the frames (in the owning frame list) whose records built this animation.
    pub frame_range: Range<usize>,
}

impl Animation {
    /// Length in ticks.
    pub fn duration(&self) -> usize {
        self.frames.len()
    }

    /// Frame displayed at `tick`. Looping animations wrap around; the rest hold
    /// their final frame.
    pub fn frame_at(&self, tick: usize) -> Option<&Arc<Frame>> {
        let len = self.frames.len();
        if len == 0 {
            return None;
        }
        let t = if tick < len {
            tick
        } else if self.is_looping {
            tick % len
        } else {
            len - 1
        };
        self.frames.get(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    Next,
    Loop,
    Stop,
    /// Unassigned code; ends the animation without looping.
    Other(u8),
}

impl Action {
    /// Any code other than 0 ends the animation; only 1 makes it loop.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Action::Next,
            1 => Action::Loop,
            2 => Action::Stop,
            other => {
                warn!(code = other, "unknown action code, ending animation without looping");
                Action::Other(other)
            }
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Action::Next => 0,
            Action::Loop => 1,
            Action::Stop => 2,
            Action::Other(code) => code,
        }
    }

    pub fn terminates(self) -> bool {
        self != Action::Next
    }
}

/// One control record as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Record {
    pub rect: Rect,
    pub origin: Point,
    pub delay: u8,
    pub action: Action,
}

impl Record {
    pub fn parse(b: &[u8; RECORD_SIZE]) -> Self {
        Record {
            rect: Rect {
                left: LittleEndian::read_i16(&b[0..2]),
                top: LittleEndian::read_i16(&b[2..4]),
                right: LittleEndian::read_i16(&b[4..6]),
                bottom: LittleEndian::read_i16(&b[6..8]),
            },
            origin: Point {
                x: LittleEndian::read_i16(&b[8..10]),
                y: LittleEndian::read_i16(&b[10..12]),
            },
            delay: b[12],
            action: Action::from_code(b[13]),
        }
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_i16::<LittleEndian>(self.rect.left)?;
        w.write_i16::<LittleEndian>(self.rect.top)?;
        w.write_i16::<LittleEndian>(self.rect.right)?;
        w.write_i16::<LittleEndian>(self.rect.bottom)?;
        w.write_i16::<LittleEndian>(self.origin.x)?;
        w.write_i16::<LittleEndian>(self.origin.y)?;
        w.write_u8(self.delay)?;
        w.write_u8(self.action.code())?;
        Ok(())
    }
}

/// The decoded contents of one control chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    pub label: Vec<u8>,
    pub frames: Vec<Arc<Frame>>,
    pub animations: Vec<Animation>,
    /// Frames after the last terminator; kept in `frames` but in no animation.
    pub unterminated: usize,
}

impl Timeline {
    pub fn records(&self) -> Vec<Record> {
        reconstruct_records(&self.frames, &self.animations)
    }
}

pub fn decode_timeline(buf: &[u8]) -> Result<Timeline> {
    let nul = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or(SheetError::TruncatedRecord("missing label terminator"))?;

    let records_start = nul + 2;
    if records_start > buf.len() {
        return Err(SheetError::TruncatedRecord("missing reserved byte"));
    }

    let records = &buf[records_start..];
    if records.len() % RECORD_SIZE != 0 {
        return Err(SheetError::TruncatedRecord(
            "record region is not a multiple of 14 bytes",
        ));
    }

    let mut timeline = Timeline {
        label: buf[..nul].to_vec(),
        ..Default::default()
    };

    let mut counter = 0usize;
    let mut pending: Vec<Arc<Frame>> = Vec::new();
    let mut first = 0usize;

    for raw in records.chunks_exact(RECORD_SIZE) {
        let mut b = [0u8; RECORD_SIZE];
        b.copy_from_slice(raw);
        let rec = Record::parse(&b);

        let frame = Arc::new(Frame {
            index: counter,
            rect: rec.rect,
            origin: rec.origin,
        });
        timeline.frames.push(Arc::clone(&frame));
        counter += 1;

        pending.extend(std::iter::repeat_n(frame, rec.delay as usize));

        if rec.action.terminates() {
            let end = timeline.frames.len();
            timeline.animations.push(Animation {
                frames: std::mem::take(&mut pending),
                is_looping: rec.action == Action::Loop,
                end_action: rec.action,
                frame_range: first..end,
            });
            first = end;
            counter = 0;
        }
    }

    timeline.unterminated = timeline.frames.len() - first;
    if timeline.unterminated > 0 {
        debug!(
            frames = timeline.unterminated,
            "discarding unterminated animation tail"
        );
    }

    Ok(timeline)
}

/// Build a control payload from a label and records.
pub fn encode_control(label: &[u8], records: &[Record]) -> Vec<u8> {
    let mut out = Vec::with_capacity(label.len() + 2 + records.len() * RECORD_SIZE);
    out.extend_from_slice(label);
    out.push(0);
    out.push(0);
    for r in records {
        // Vec<u8> writes are infallible.
        let _ = r.write_to(&mut out);
    }
    out
}

/// Recover the record sequence behind a set of terminated animations.
///
/// `frames` is the list the animations' `frame_range`s index into. Frames that
/// belong to no animation (unterminated tails) are not represented.
pub fn reconstruct_records(frames: &[Arc<Frame>], animations: &[Animation]) -> Vec<Record> {
    let mut out = Vec::new();
    for anim in animations {
        let Some(last) = anim.frame_range.end.checked_sub(1) else {
            continue;
        };
        for g in anim.frame_range.clone() {
            let Some(frame) = frames.get(g) else {
                break;
            };
            let shown = anim.frames.iter().filter(|f| Arc::ptr_eq(f, frame)).count();
            let action = if g != last {
                Action::Next
            } else {
                anim.end_action
            };
            out.push(Record {
                rect: frame.rect,
                origin: frame.origin,
                delay: u8::try_from(shown).unwrap_or(u8::MAX),
                action,
            });
        }
    }
    out
}
