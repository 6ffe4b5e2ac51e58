use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use thiserror::Error;

use super::packets::{Packet, ReplayPacket};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("replay I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("replay frame could not be encoded or decoded: {0}")]
    Codec(#[from] bincode::Error),
    #[error("replay frame of {0} bytes does not fit a two-byte length prefix")]
    FrameTooLarge(u64),
}

// Writes packets as frames: two bytes of big-endian payload length, then the
// bincode payload.
pub struct ReplayWriter<W: Write> {
    writer: W,
}

impl ReplayWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        Ok(ReplayWriter::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> ReplayWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, packet: &ReplayPacket) -> Result<(), ReplayError> {
        let size = packet.packet_size()?;
        if size > u16::MAX as u64 {
            return Err(ReplayError::FrameTooLarge(size));
        }

        self.writer.write_all(&[(size >> 8) as u8, size as u8])?;
        packet.write_packet(&mut self.writer)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ReplayError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub struct ReplayReader<R: Read> {
    reader: R,
}

impl ReplayReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        Ok(ReplayReader::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read> ReplayReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    // None once the stream ends cleanly on a frame boundary
    pub fn next_packet(&mut self) -> Result<Option<ReplayPacket>, ReplayError> {
        let mut buffer: [u8; 2] = [0, 0];
        match self.reader.read_exact(&mut buffer) {
            Ok(_) => {}
            Err(ref e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let packet_size = ((buffer[0] as u16) << 8) | buffer[1] as u16;

        let mut frame = Read::by_ref(&mut self.reader).take(packet_size as u64);
        let packet = ReplayPacket::parse_packet(&mut frame)?;
        Ok(Some(packet))
    }

    pub fn read_all(&mut self) -> Result<Vec<ReplayPacket>, ReplayError> {
        let mut packets = Vec::new();
        while let Some(packet) = self.next_packet()? {
            packets.push(packet);
        }
        Ok(packets)
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::replay::{DriverKind, RaceSnapshot, VehicleSnapshot};
    use crate::track::Track;
    use crate::vehicle_location::VehicleLocation;
    use crate::weather::Weather;

    fn sample_race() -> Vec<ReplayPacket> {
        vec![
            ReplayPacket::RaceStart {
                track: Track::default_oval(800.0, 600.0, 60.0),
                weather: Weather::Rain,
                drivers: vec![DriverKind::Human, DriverKind::RuleBased],
                lap_goal: 3,
            },
            ReplayPacket::Tick(RaceSnapshot {
                tick: 1,
                race_time_ms: 16,
                vehicles: vec![VehicleSnapshot {
                    id: 0,
                    location: VehicleLocation::new(DVec2::new(360.0, 95.0), 1.5),
                    velocity: 0.1,
                    lap: 0,
                    visited: vec![false, true, false],
                    finished: false,
                }],
            }),
            ReplayPacket::RaceEnd {
                placements: vec![(1, 1, Some(15_000)), (2, 0, None)],
            },
        ]
    }

    #[test]
    fn frames_read_back_in_order() {
        let mut writer = ReplayWriter::new(Vec::new());
        for packet in sample_race() {
            writer.write(&packet).unwrap();
        }
        let bytes = writer.into_inner();

        let mut reader = ReplayReader::new(bytes.as_slice());
        assert_eq!(reader.read_all().unwrap(), sample_race());
    }

    #[test]
    fn replay_files_round_trip() {
        let path = std::env::temp_dir().join("lastkart-replay-test.bin");

        let mut writer = ReplayWriter::create(&path).unwrap();
        for packet in sample_race() {
            writer.write(&packet).unwrap();
        }
        writer.flush().unwrap();
        drop(writer);

        let mut reader = ReplayReader::open(&path).unwrap();
        assert_eq!(reader.read_all().unwrap(), sample_race());
    }

    #[test]
    fn truncated_frame_is_an_error() {
        let mut writer = ReplayWriter::new(Vec::new());
        writer.write(&sample_race()[1]).unwrap();
        let mut bytes = writer.into_inner();
        bytes.truncate(bytes.len() - 3);

        let mut reader = ReplayReader::new(bytes.as_slice());
        assert!(reader.next_packet().is_err());
    }

    #[test]
    fn oversized_frames_are_refused() {
        let snapshot = RaceSnapshot {
            tick: 0,
            race_time_ms: 0,
            vehicles: vec![VehicleSnapshot {
                id: 0,
                location: VehicleLocation::new(DVec2::ZERO, 0.0),
                velocity: 0.0,
                lap: 0,
                visited: vec![false; 70_000],
                finished: false,
            }],
        };

        let mut writer = ReplayWriter::new(Vec::new());
        assert!(matches!(
            writer.write(&ReplayPacket::Tick(snapshot)),
            Err(ReplayError::FrameTooLarge(_))
        ));
    }
}
