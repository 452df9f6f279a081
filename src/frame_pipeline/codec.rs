//! The frame-level orchestrator. Runs classification and the per-block
//! transform across a whole frame and routes the resulting block stream
//! through the byte back end.
//!
//! The codec itself is stateless: the temporal reference is passed in and a
//! fresh one is handed back, so the facade decides what to keep.

use crate::error::DepthError;
use crate::frame_pipeline::artifact::{read_frame, write_frame, FrameHeader};
use crate::frame_pipeline::classify::SampleClassifier;
use crate::frame_pipeline::partition::{BlockGrid, BLOCK_AREA};
use crate::kernels::block::{self, Block, MAX_RECORD_LEN};
use crate::kernels::zigzag;
use crate::kernels::zstd::ZstdBackend;
use crate::profile::EncodeMode;
use crate::traits::ByteCodecBackend;
use crate::types::DepthFrame;

//==================================================================================
// 1. Data Contracts
//==================================================================================

/// A canonicalized frame kept for temporal prediction, tagged with what it
/// was encoded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFrame {
    pub mode: EncodeMode,
    pub frame_number: u16,
    /// Samples in the block layer's value space.
    pub codes: DepthFrame,
}

impl ReferenceFrame {
    fn matches(&self, mode: EncodeMode, width: u32, height: u32) -> bool {
        self.mode == mode && self.codes.width() == width && self.codes.height() == height
    }
}

/// Per-frame size and block accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub raw_bytes: usize,
    pub block_stream_bytes: usize,
    pub compressed_bytes: usize,
    pub blocks_total: usize,
    pub blocks_all_zero: usize,
    pub blocks_temporal: usize,
    pub keyframe: bool,
}

/// Output of a successful encode.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    pub bytes: Vec<u8>,
    pub header: FrameHeader,
    pub reference: ReferenceFrame,
    pub stats: FrameStats,
}

/// Output of a successful decode.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub frame: DepthFrame,
    pub header: FrameHeader,
    pub reference: ReferenceFrame,
}

//==================================================================================
// 2. Per-Block Decision
//==================================================================================

/// Chooses between independent and temporal coding for one block.
///
/// Returns `(temporal, values_to_encode)`. The temporal candidate wins ties.
pub fn choose_block(current: &Block, previous: Option<&Block>) -> (bool, Block) {
    if let Some(previous) = previous {
        let mut residuals = [0u16; BLOCK_AREA];
        if zigzag::encode_block(current, previous, &mut residuals).is_some()
            && block::encoded_len(&residuals) <= block::encoded_len(current)
        {
            return (true, residuals);
        }
    }
    (false, *current)
}

//==================================================================================
// 3. The Codec
//==================================================================================

/// Encodes and decodes whole frames over a pluggable byte back end.
#[derive(Debug, Clone, Default)]
pub struct FrameCodec<B: ByteCodecBackend = ZstdBackend> {
    backend: B,
}

impl<B: ByteCodecBackend> FrameCodec<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Encodes `frame` under `mode`.
    ///
    /// `reference` is used only when it matches `mode` and the frame's
    /// dimensions; pass `None` to force a keyframe.
    pub fn encode(
        &self,
        frame: &DepthFrame,
        mode: EncodeMode,
        reference: Option<&ReferenceFrame>,
        frame_number: u16,
    ) -> Result<EncodedFrame, DepthError> {
        self.encode_samples(
            frame.width(),
            frame.height(),
            frame.samples(),
            mode,
            reference,
            frame_number,
        )
    }

    /// As `encode`, over a borrowed row-major sample buffer.
    pub fn encode_samples(
        &self,
        width: u32,
        height: u32,
        samples: &[u16],
        mode: EncodeMode,
        reference: Option<&ReferenceFrame>,
        frame_number: u16,
    ) -> Result<EncodedFrame, DepthError> {
        let grid = BlockGrid::new(width, height)?;
        let expected = grid.block_count() * BLOCK_AREA;
        if samples.len() != expected {
            return Err(DepthError::InvalidSampleCount {
                expected,
                got: samples.len(),
            });
        }
        let classifier = SampleClassifier::for_mode(mode);
        let working = classifier.canonicalize_all(samples);

        let reference = reference.filter(|r| r.matches(mode, width, height));

        let mut stream = Vec::with_capacity(grid.block_count() * 16);
        let mut stats = FrameStats {
            raw_bytes: samples.len() * std::mem::size_of::<u16>(),
            blocks_total: grid.block_count(),
            ..FrameStats::default()
        };

        let mut current = [0u16; BLOCK_AREA];
        let mut previous = [0u16; BLOCK_AREA];
        for coord in grid.blocks() {
            grid.gather(&working, coord, &mut current);
            let prev = match reference {
                Some(r) => {
                    grid.gather(r.codes.samples(), coord, &mut previous);
                    Some(&previous)
                }
                None => None,
            };
            let (temporal, values) = choose_block(&current, prev);
            let descriptor = block::encode(&values, temporal, &mut stream)?;
            stats.blocks_temporal += descriptor.temporal as usize;
            stats.blocks_all_zero += descriptor.all_zero as usize;
        }

        let keyframe = stats.blocks_temporal == 0;
        let payload = self.backend.compress(&stream)?;
        let header = FrameHeader {
            mode,
            width,
            height,
            keyframe,
            frame_number,
            payload_len: 0,
        };
        let bytes = write_frame(header, &payload)?;

        stats.block_stream_bytes = stream.len();
        stats.compressed_bytes = bytes.len();
        stats.keyframe = keyframe;

        log::debug!(
            "encoded frame #{} {}x{} {} keyframe={} blocks={} zero={} temporal={} stream={}B out={}B",
            frame_number,
            width,
            height,
            mode,
            keyframe,
            stats.blocks_total,
            stats.blocks_all_zero,
            stats.blocks_temporal,
            stats.block_stream_bytes,
            stats.compressed_bytes,
        );
        log_metric!("event"="encode_frame", "frame"=frame_number, "keyframe"=keyframe, "bytes"=stats.compressed_bytes);

        Ok(EncodedFrame {
            header: FrameHeader {
                payload_len: payload.len() as u32,
                ..header
            },
            bytes,
            reference: ReferenceFrame {
                mode,
                frame_number,
                codes: DepthFrame::new(width, height, working)?,
            },
            stats,
        })
    }

    /// Decodes one frame.
    ///
    /// Delta frames require `reference` to be the frame immediately before
    /// this one (same mode, same dimensions, previous frame number).
    pub fn decode(
        &self,
        bytes: &[u8],
        reference: Option<&ReferenceFrame>,
    ) -> Result<DecodedFrame, DepthError> {
        let (header, payload) = read_frame(bytes)?;
        let grid = BlockGrid::new(header.width, header.height)?;
        let classifier = SampleClassifier::for_mode(header.mode);

        let reference = if header.keyframe {
            None
        } else {
            Some(require_reference(&header, reference)?)
        };

        let max_stream_len = grid.block_count() * MAX_RECORD_LEN;
        let stream = self
            .backend
            .decompress(payload, max_stream_len)
            .map_err(|e| match e {
                DepthError::WrongFormat(_) => e,
                other => DepthError::WrongFormat(other.to_string()),
            })?;
        if stream.len() < grid.block_count() {
            return Err(DepthError::truncated(grid.block_count(), stream.len()));
        }

        let limit = classifier.code_limit();
        let mut codes = vec![0u16; grid.block_count() * BLOCK_AREA];
        let mut values = [0u16; BLOCK_AREA];
        let mut previous = [0u16; BLOCK_AREA];
        let mut pos = 0usize;

        for coord in grid.blocks() {
            let (descriptor, used) = block::decode(&stream[pos..], &mut values)?;
            pos += used;

            if descriptor.temporal {
                let r = reference.ok_or_else(|| {
                    DepthError::WrongFormat("Temporal block inside a keyframe".into())
                })?;
                grid.gather(r.codes.samples(), coord, &mut previous);
                zigzag::decode_block(&previous, &mut values)?;
            }
            if let Some(v) = values.iter().find(|&&v| v >= limit) {
                return Err(DepthError::WrongFormat(format!(
                    "Decoded sample {} is outside the {} range",
                    v, header.mode
                )));
            }
            grid.scatter(&mut codes, coord, &values);
        }

        if pos != stream.len() {
            return Err(DepthError::WrongFormat(format!(
                "{} unused bytes after the last block",
                stream.len() - pos
            )));
        }

        log::debug!(
            "decoded frame #{} {}x{} {} keyframe={}",
            header.frame_number,
            header.width,
            header.height,
            header.mode,
            header.keyframe,
        );

        let frame = DepthFrame::new(header.width, header.height, classifier.restore_all(&codes))?;
        Ok(DecodedFrame {
            frame,
            header,
            reference: ReferenceFrame {
                mode: header.mode,
                frame_number: header.frame_number,
                codes: DepthFrame::new(header.width, header.height, codes)?,
            },
        })
    }
}

fn require_reference<'a>(
    header: &FrameHeader,
    reference: Option<&'a ReferenceFrame>,
) -> Result<&'a ReferenceFrame, DepthError> {
    let r = reference.ok_or_else(|| {
        DepthError::MissingReference(format!(
            "delta frame #{} arrived before any keyframe",
            header.frame_number
        ))
    })?;
    if !r.matches(header.mode, header.width, header.height) {
        return Err(DepthError::MissingReference(format!(
            "delta frame #{} ({} {}x{}) does not match the held reference ({} {}x{})",
            header.frame_number,
            header.mode,
            header.width,
            header.height,
            r.mode,
            r.codes.width(),
            r.codes.height()
        )));
    }
    if r.frame_number.wrapping_add(1) != header.frame_number {
        return Err(DepthError::MissingReference(format!(
            "delta frame #{} does not follow held frame #{}",
            header.frame_number, r.frame_number
        )));
    }
    Ok(r)
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
