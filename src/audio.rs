//! Synthesized sound effects. Each clip is rendered to a sample buffer at
//! startup with fundsp unit generators and played fire-and-forget through a
//! detached rodio sink. A machine with no output device gets a silent game.

use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

use crate::game::Clip;

const SAMPLE_RATE: f64 = 44100.0;

/// Render one clip to mono samples.
pub fn synthesize(clip: Clip) -> Vec<f32> {
    match clip {
        // rising triangle sweep
        Clip::Start => {
            let freq = lfo(|t: f64| xerp(260.0, 520.0, (t / 0.25).min(1.0)));
            let gain = lfo(|t: f64| lerp(0.2, 0.0, (t / 0.25).min(1.0)));
            let mut unit = (freq >> triangle()) * gain;
            render(0.25, &mut unit)
        }
        // short upward chirp
        Clip::Flap => {
            let freq = lfo(|t: f64| xerp(300.0, 700.0, (t / 0.12).min(1.0)));
            let gain = lfo(|t: f64| lerp(0.25, 0.0, (t / 0.12).min(1.0)));
            let mut unit = (freq >> sine::<f64>()) * gain;
            render(0.12, &mut unit)
        }
        // two-tone ding
        Clip::Score => {
            let freq = lfo(|t: f64| if t < 0.07 { 880.0 } else { 1318.5 });
            let gain = lfo(|t: f64| lerp(0.2, 0.0, (t / 0.15).min(1.0)));
            let mut unit = (freq >> sine::<f64>()) * gain;
            render(0.15, &mut unit)
        }
        // low-passed noise burst
        Clip::Hit => {
            let gain = lfo(|t: f64| lerp(0.3, 0.0, (t / 0.2).min(1.0)));
            let mut unit = (noise() >> lowpass_hz(900.0, 0.7)) * gain;
            render(0.2, &mut unit)
        }
        // descending saw, the classic death slide
        Clip::Die => {
            let freq = lfo(|t: f64| xerp(400.0, 80.0, (t / 0.4).min(1.0)));
            let gain = lfo(|t: f64| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
            let mut unit = (freq >> saw()) * gain;
            render(0.5, &mut unit)
        }
    }
}

fn render(seconds: f64, unit: &mut dyn AudioUnit) -> Vec<f32> {
    let wave = Wave::render(SAMPLE_RATE, seconds, unit);
    (0..wave.len()).map(|i| wave.at(0, i)).collect()
}

pub struct Audio {
    // the stream must stay alive for detached sinks to keep playing
    _stream: OutputStream,
    handle: OutputStreamHandle,
    bank: Vec<Vec<f32>>,
}

impl Audio {
    /// Open the default output device and pre-render the clip bank.
    /// Returns None when no device is available.
    pub fn new() -> Option<Self> {
        let (stream, handle) = OutputStream::try_default().ok()?;
        let bank = Clip::ALL.iter().map(|&c| synthesize(c)).collect();
        Some(Audio {
            _stream: stream,
            handle,
            bank,
        })
    }

    /// Fire-and-forget playback; errors are ignored.
    pub fn play(&self, clip: Clip) {
        if let Ok(sink) = Sink::try_new(&self.handle) {
            let samples = self.bank[clip as usize].clone();
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE as u32, samples));
            sink.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_clip_renders_audible_bounded_samples() {
        for clip in Clip::ALL {
            let samples = synthesize(clip);
            assert!(!samples.is_empty(), "{clip:?} rendered no samples");
            assert!(
                samples.iter().any(|s| s.abs() > 0.01),
                "{clip:?} rendered silence"
            );
            assert!(
                samples.iter().all(|s| s.abs() <= 1.0),
                "{clip:?} clips outside [-1, 1]"
            );
        }
    }

    #[test]
    fn clip_indices_match_the_bank_order() {
        for (i, clip) in Clip::ALL.iter().enumerate() {
            assert_eq!(*clip as usize, i);
        }
    }
}
