//! `symphonia`-backed [`TrackSource`].

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	source::{Frame,Pull,TrackSource},
	error::{SourceError,DecodeError,SeekError},
	macros::{trace2,warn2},
};
use std::{
	fmt,
	fs::File,
	ffi::OsStr,
	path::Path,
};
use symphonia::core::{
	audio::SampleBuffer,
	codecs::{Decoder,DecoderOptions,CODEC_TYPE_NULL},
	errors::Error,
	formats::{FormatReader,FormatOptions,SeekMode,SeekTo},
	io::{MediaSourceStream,MediaSourceStreamOptions},
	meta::{MetadataOptions,Limit},
	probe::Hint,
	units::{Time,TimeBase},
};
use symphonia::default::{get_probe,get_codecs};

//---------------------------------------------------------------------------------------------------- Constants
// `symphonia` format options.
//
// These are some misc options `Symphonia` needs.
// Most of these are the default values, but as `const`.

/// Gapless is what makes the hand-off between two tracks seamless,
/// encoder delay/padding gets trimmed by the reader.
pub(crate) const FORMAT_OPTIONS: FormatOptions = FormatOptions {
	enable_gapless: true,
	prebuild_seek_index: false,
	seek_index_fill_rate: 20,
};

pub(crate) const METADATA_OPTIONS: MetadataOptions = MetadataOptions {
	limit_metadata_bytes: Limit::Default,
	limit_visual_bytes: Limit::Default,
};

pub(crate) const DECODER_OPTIONS: DecoderOptions = DecoderOptions {
	verify: false,
};

pub(crate) const MEDIA_SOURCE_STREAM_OPTIONS: MediaSourceStreamOptions = MediaSourceStreamOptions {
	buffer_len: 64 * 1024,
};

/// How many consecutive malformed packets are skipped
/// before a pull gives up with [`Pull::Error`].
pub(crate) const MAX_DECODE_RETRIES: usize = 3;

//---------------------------------------------------------------------------------------------------- SourceDecode
/// A decoded audio file.
///
/// Packets are decoded lazily, one at a time, as the queue pulls frames.
/// The last decoded packet is kept in a re-usable [`SampleBuffer`].
///
/// Mono tracks are played on both channels,
/// tracks with more than 2 channels keep the first 2.
pub struct SourceDecode {
	/// The current audio file/sound/source.
	reader: Box<dyn FormatReader>,
	/// The current audio's decoder
	decoder: Box<dyn Decoder>,
	/// The track within `reader` we are decoding.
	track_id: u32,
	/// The audio's sample rate, non-zero.
	sample_rate: u32,
	/// The audio's `TimeBase`, used to turn seek timestamps into frames.
	timebase: Option<TimeBase>,
	/// The last decoded packet, interleaved.
	buffer: Option<SampleBuffer<f32>>,
	/// Channel count of `buffer`.
	channels: usize,
	/// Next frame of `buffer` to hand out.
	offset: usize,
	/// Total frames in `buffer`.
	len: usize,
	/// Frames still to be dropped after an accurate seek.
	skip: usize,
	/// Set by [`TrackSource::close`].
	closed: bool,
}

impl SourceDecode {
	/// Open the audio file at `path`.
	///
	/// The file extension (if any) is used as a hint for the container.
	///
	/// # Errors
	/// If the file cannot be opened, is not audio,
	/// or has no track with a supported codec.
	pub fn open(path: &Path) -> Result<Self, SourceError> {
		let file = File::open(path)?;
		let mss = MediaSourceStream::new(
			Box::new(file),
			MEDIA_SOURCE_STREAM_OPTIONS,
		);

		let mut hint = Hint::new();
		if let Some(extension) = path.extension().and_then(OsStr::to_str) {
			hint.with_extension(extension);
		}

		Self::try_from_mss(mss, &hint)
	}

	/// Probe and set up decoding from any `symphonia` stream.
	fn try_from_mss(mss: MediaSourceStream, hint: &Hint) -> Result<Self, SourceError> {
		let result = get_probe().format(
			hint,
			mss,
			&FORMAT_OPTIONS,
			&METADATA_OPTIONS
		)?;

		let reader = result.format;
		let codecs = get_codecs();

		// Select the first track with a known codec.
		let Some(track) = reader
			.tracks()
			.iter()
			.find(|t| {
				// Make sure it is not null.
				t.codec_params.codec != CODEC_TYPE_NULL &&
				// And it exists in our codec registry.
				codecs.get_codec(t.codec_params.codec).is_some()
			})
		else {
			return Err(SourceError::Track);
		};

		// Create a decoder for the track.
		let decoder = codecs
			.make(&track.codec_params, &DECODER_OPTIONS)
			.map_err(DecodeError::from)?;

		let Some(sample_rate) = track.codec_params.sample_rate.filter(|rate| *rate != 0) else {
			return Err(SourceError::SampleRate);
		};
		let track_id = track.id;
		let timebase = track.codec_params.time_base;

		Ok(Self {
			reader,
			decoder,
			track_id,
			sample_rate,
			timebase,
			buffer: None,
			channels: 0,
			offset: 0,
			len: 0,
			skip: 0,
			closed: false,
		})
	}

	/// Decode the next packet of our track into `buffer`.
	///
	/// `Ok(false)` means the stream is over.
	fn decode_next(&mut self) -> Result<bool, DecodeError> {
		let mut errors = 0;

		loop {
			let packet = match self.reader.next_packet() {
				Ok(packet) => packet,
				// This "end of stream" error is currently the only way
				// a [FormatReader] can indicate the media is complete.
				Err(Error::IoError(_)) => return Ok(false),
				Err(e) => return Err(e.into()),
			};

			if packet.track_id() != self.track_id {
				continue;
			}

			// Malformed packets are skipped, up to a limit.
			let decoded = match self.decoder.decode(&packet) {
				Ok(decoded) => decoded,
				Err(Error::DecodeError(e)) if errors < MAX_DECODE_RETRIES => {
					warn2!("SourceDecode - skipping malformed packet: {e}");
					errors += 1;
					continue;
				},
				Err(e) => return Err(e.into()),
			};

			let spec = *decoded.spec();
			let channels = spec.channels.count();
			if decoded.frames() == 0 || channels == 0 {
				continue;
			}

			// Only re-allocate if this packet is bigger than any before it.
			let samples = decoded.capacity() * channels;
			if self.buffer.as_ref().map_or(true, |b| b.capacity() < samples) {
				self.buffer = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
			}
			let Some(buffer) = self.buffer.as_mut() else {
				continue;
			};
			buffer.copy_interleaved_ref(decoded);

			self.channels = channels;
			self.len      = buffer.samples().len() / channels;

			// Drop the frames between where the reader
			// landed and where the seek asked to go.
			let skip = self.skip.min(self.len);
			self.offset = skip;
			self.skip  -= skip;

			return Ok(true);
		}
	}

	/// Copy as many buffered frames as fit into `frames`.
	fn copy_into(&mut self, frames: &mut [Frame]) -> usize {
		let Some(buffer) = self.buffer.as_ref() else {
			self.len = 0;
			return 0;
		};

		let samples  = buffer.samples();
		let channels = self.channels;
		let n = frames.len().min(self.len - self.offset);

		for (i, frame) in frames[..n].iter_mut().enumerate() {
			let base = (self.offset + i) * channels;
			*frame = if channels == 1 {
				[samples[base]; 2]
			} else {
				[samples[base], samples[base + 1]]
			};
		}

		self.offset += n;
		n
	}

	/// Convert a duration in `timebase` units into frames.
	fn ts_to_frames(&self, ts: u64) -> usize {
		match self.timebase {
			Some(timebase) => {
				let time = timebase.calc_time(ts);
				let secs = time.seconds as f64 + time.frac;
				(secs * f64::from(self.sample_rate)).round() as usize
			},
			// No timebase, timestamps are frames.
			None => usize::try_from(ts).unwrap_or(usize::MAX),
		}
	}
}

//---------------------------------------------------------------------------------------------------- TrackSource Impl
impl TrackSource for SourceDecode {
	fn pull(&mut self, frames: &mut [Frame]) -> Pull {
		if self.closed {
			return Pull::End(0);
		}

		let mut filled = 0;
		while filled < frames.len() {
			if self.offset >= self.len {
				match self.decode_next() {
					Ok(true) => continue,
					Ok(false) => {
						trace2!("SourceDecode - end of stream after {filled} frames");
						return Pull::End(filled);
					},
					Err(error) => return Pull::Error { frames: filled, error },
				}
			}

			filled += self.copy_into(&mut frames[filled..]);
		}

		Pull::Full
	}

	fn seek(&mut self, frame: u64) -> Result<(), SeekError> {
		if self.closed {
			return Err(SeekError::Closed);
		}

		let rate = u64::from(self.sample_rate);
		let time = Time {
			seconds: frame / rate,
			frac: (frame % rate) as f64 / rate as f64,
		};

		let seeked = self.reader.seek(
			SeekMode::Accurate,
			SeekTo::Time { time, track_id: Some(self.track_id) },
		)?;

		// INVARIANT: the decoder must forget any
		// state from before the jump.
		self.decoder.reset();
		self.offset = 0;
		self.len    = 0;
		self.skip   = self.ts_to_frames(seeked.required_ts.saturating_sub(seeked.actual_ts));

		Ok(())
	}

	fn close(&mut self) {
		self.closed = true;
		self.offset = 0;
		self.len    = 0;
	}

	fn is_closed(&self) -> bool {
		self.closed
	}

	fn sample_rate(&self) -> u32 {
		self.sample_rate
	}
}

//---------------------------------------------------------------------------------------------------- Debug
impl fmt::Debug for SourceDecode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SourceDecode")
			.field("track_id", &self.track_id)
			.field("sample_rate", &self.sample_rate)
			.field("channels", &self.channels)
			.field("offset", &self.offset)
			.field("len", &self.len)
			.field("closed", &self.closed)
			.finish_non_exhaustive()
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use crate::source::SILENCE;
	use pretty_assertions::assert_eq;

	#[test]
	fn pull_until_end() {
		let dir  = tempfile::tempdir().unwrap();
		let path = crate::tests::write_wav(dir.path(), "00.wav", 2, 1000, 16384);

		let mut source = SourceDecode::open(&path).unwrap();
		assert_eq!(source.sample_rate(), crate::tests::WAV_SAMPLE_RATE);

		let mut frames = vec![SILENCE; 600];
		assert!(matches!(source.pull(&mut frames), Pull::Full));
		assert!(frames.iter().all(|f| *f == [0.5, -0.5]));

		// 400 left.
		let pull = source.pull(&mut frames);
		assert!(matches!(pull, Pull::End(400)), "{pull:?}");
		assert!(matches!(source.pull(&mut frames), Pull::End(0)));
	}

	#[test]
	fn rewind() {
		let dir  = tempfile::tempdir().unwrap();
		let path = crate::tests::write_wav(dir.path(), "01.wav", 2, 300, 8192);

		let mut source = SourceDecode::open(&path).unwrap();
		let mut frames = vec![SILENCE; 1000];
		assert!(matches!(source.pull(&mut frames), Pull::End(300)));

		source.seek(0).unwrap();
		frames.fill(SILENCE);
		assert!(matches!(source.pull(&mut frames), Pull::End(300)));
		assert!(frames[..300].iter().all(|f| *f == [0.25, -0.25]));
	}

	#[test]
	fn mono_is_duplicated() {
		let dir  = tempfile::tempdir().unwrap();
		let path = crate::tests::write_wav(dir.path(), "02.wav", 1, 100, 16384);

		let mut source = SourceDecode::open(&path).unwrap();
		let mut frames = vec![SILENCE; 100];
		assert!(matches!(source.pull(&mut frames), Pull::Full));
		assert!(frames.iter().all(|f| *f == [0.5, 0.5]));
	}

	#[test]
	fn closed() {
		let dir  = tempfile::tempdir().unwrap();
		let path = crate::tests::write_wav(dir.path(), "03.wav", 2, 100, 16384);

		let mut source = SourceDecode::open(&path).unwrap();
		source.close();
		source.close();
		assert!(source.is_closed());

		let mut frames = vec![SILENCE; 10];
		assert!(matches!(source.pull(&mut frames), Pull::End(0)));
		assert!(matches!(source.seek(0), Err(SeekError::Closed)));
	}

	#[test]
	fn open_errors() {
		let dir = tempfile::tempdir().unwrap();

		// Missing.
		let error = SourceDecode::open(&dir.path().join("missing.flac")).unwrap_err();
		assert!(matches!(error, SourceError::File(_)));

		// Not audio.
		let path = dir.path().join("04.flac");
		std::fs::write(&path, b"definitely not a flac file").unwrap();
		assert!(SourceDecode::open(&path).is_err());
	}
}
