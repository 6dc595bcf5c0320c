//! Per-command completion rules.
//!
//! The frame codecs only know when a frame (V1) or a length (V2) is
//! complete. Whether a *response* is complete depends on the command: logs
//! announce a frame count, the clock acknowledgment arrives after a notice
//! frame, measurements stream "still measuring" frames first.

use bluering_frame::FrameError;

use crate::payload::clock::PACKET_SIZE_NOTICE;

/// Sequence or marker value meaning the device has nothing stored.
pub const NO_DATA: u8 = 0xFF;

/// Marker the activity log's first frame carries in byte 1.
pub const ACTIVITY_MARKER: u8 = 0xF0;

/// How a command decides its response is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The first frame is the whole response.
    FirstFrame,
    /// Byte 2 of the first frame is the frame count, byte 1 of every frame
    /// its sequence number. [`NO_DATA`] in the sequence slot ends the
    /// response early.
    CountedLog,
    /// First frame announces the number of data frames that follow.
    ActivityLog,
    /// Done when a frame echoes the opcode; packet-size notices skipped.
    OpcodeEcho,
    /// Done on an error code (byte 2) or a reading (byte 3).
    Measurement,
    /// V2: done once the announced payload length has arrived.
    PayloadLength,
}

impl Completion {
    /// Completion is decided by the frame codec rather than the tracker.
    pub fn defers_to_codec(self) -> bool {
        self == Completion::PayloadLength
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Completion::FirstFrame => "first frame",
            Completion::CountedLog => "counted log",
            Completion::ActivityLog => "activity log",
            Completion::OpcodeEcho => "opcode echo",
            Completion::Measurement => "measurement",
            Completion::PayloadLength => "payload length",
        }
    }
}

/// What to do with a delivered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Part of the response.
    Store,
    /// Meaningful, but not part of the response body.
    SetAside,
    /// Not kept at all.
    Drop,
}

/// Tracker's ruling on one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub disposition: Disposition,
    pub done: bool,
    /// Done because the device reported nothing stored.
    pub no_data: bool,
    /// Non-fatal protocol observations (sequence, markers).
    pub observations: Vec<FrameError>,
}

impl Verdict {
    fn store(done: bool) -> Self {
        Self {
            disposition: Disposition::Store,
            done,
            no_data: false,
            observations: Vec::new(),
        }
    }
}

/// Applies one [`Completion`] rule across the frames of a response.
#[derive(Debug)]
pub struct Tracker {
    completion: Completion,
    opcode: u8,
    expected: Option<usize>,
    count: usize,
}

fn byte(buf: &[u8], index: usize) -> u8 {
    buf.get(index).copied().unwrap_or(0)
}

impl Tracker {
    pub fn new(completion: Completion, opcode: u8) -> Self {
        Self {
            completion,
            opcode,
            expected: None,
            count: 0,
        }
    }

    /// Frames counted toward the response so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Frame count announced by the first frame, for counted responses.
    pub fn expected(&self) -> Option<usize> {
        self.expected
    }

    pub fn observe(&mut self, buf: &[u8]) -> Verdict {
        match self.completion {
            Completion::FirstFrame => Verdict::store(true),
            Completion::PayloadLength => Verdict::store(false),
            Completion::CountedLog => self.counted(buf),
            Completion::ActivityLog => self.activity(buf),
            Completion::OpcodeEcho => self.opcode_echo(buf),
            Completion::Measurement => {
                let done = byte(buf, 2) != 0 || byte(buf, 3) != 0;
                Verdict::store(done)
            }
        }
    }

    fn counted(&mut self, buf: &[u8]) -> Verdict {
        let frames = *self
            .expected
            .get_or_insert_with(|| usize::from(byte(buf, 2)));
        let seq = byte(buf, 1);
        let mut observations = Vec::new();
        if usize::from(seq) != self.count {
            if seq == NO_DATA {
                return self.no_data();
            }
            observations.push(FrameError::SequenceMismatch {
                expected: self.count,
                actual: seq,
            });
        }
        self.count += 1;
        Verdict {
            observations,
            ..Verdict::store(self.count >= frames)
        }
    }

    fn activity(&mut self, buf: &[u8]) -> Verdict {
        let mut observations = Vec::new();
        match self.expected {
            None => {
                let marker = byte(buf, 1);
                if marker == NO_DATA {
                    return self.no_data();
                }
                if marker != ACTIVITY_MARKER {
                    observations.push(FrameError::UnexpectedMarker {
                        expected: ACTIVITY_MARKER,
                        actual: marker,
                    });
                }
                self.expected = Some(usize::from(byte(buf, 2)));
            }
            Some(frames) => {
                let index = byte(buf, 5);
                if usize::from(index) != self.count - 1 {
                    observations.push(FrameError::SequenceMismatch {
                        expected: self.count - 1,
                        actual: index,
                    });
                }
                let announced = byte(buf, 6);
                if usize::from(announced) != frames {
                    observations.push(FrameError::FrameCountMismatch {
                        expected: frames as u8,
                        actual: announced,
                    });
                }
            }
        }
        self.count += 1;
        let frames = self.expected.unwrap_or(0);
        Verdict {
            observations,
            ..Verdict::store(self.count > frames)
        }
    }

    fn opcode_echo(&mut self, buf: &[u8]) -> Verdict {
        if byte(buf, 0) == PACKET_SIZE_NOTICE {
            return Verdict {
                disposition: Disposition::SetAside,
                done: false,
                no_data: false,
                observations: Vec::new(),
            };
        }
        self.count += 1;
        Verdict::store(byte(buf, 0) & 0x7F == self.opcode)
    }

    /// Sentinel frame: not stored. Only an empty response counts as no data;
    /// frames already stored are still decoded.
    fn no_data(&self) -> Verdict {
        Verdict {
            disposition: Disposition::Drop,
            done: true,
            no_data: self.count == 0,
            observations: Vec::new(),
        }
    }
}
