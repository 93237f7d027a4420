use std::ffi::OsStr;
use std::path::Path;

/// Header details of a WAV clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInfo {
    pub channels: u16,
    pub sample_rate: u32,
    /// Duration of the audio in seconds
    pub duration_secs: f64,
}

/// Read the header of a WAV file.
///
/// Returns `None` for other formats and for files hound cannot parse; a
/// broken clip is still mapped, it just goes unprobed.
pub fn probe_wav(path: &Path) -> Option<AudioInfo> {
    let is_wav = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
    if !is_wav {
        return None;
    }

    let reader = match hound::WavReader::open(path) {
        Ok(reader) => reader,
        Err(e) => {
            log::debug!("Cannot read WAV header of {}: {e}", path.display());
            return None;
        }
    };
    let spec = reader.spec();
    let duration_secs = if spec.sample_rate == 0 {
        0.0
    } else {
        reader.duration() as f64 / spec.sample_rate as f64
    };

    Some(AudioInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::probe_wav;

    #[test]
    fn reads_wav_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 24000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..12000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let info = probe_wav(&path).expect("valid wav");
        assert_eq!(info.sample_rate, 24000);
        assert_eq!(info.channels, 1);
        assert!((info.duration_secs - 0.5).abs() < 1e-9);
    }

    #[test]
    fn ignores_other_formats_and_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("clip.mp3");
        std::fs::write(&mp3, b"ID3").unwrap();
        assert!(probe_wav(&mp3).is_none());

        let bogus = dir.path().join("bogus.wav");
        std::fs::write(&bogus, b"not a riff file").unwrap();
        assert!(probe_wav(&bogus).is_none());
    }
}
