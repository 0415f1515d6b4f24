//! Sound cues played from WAV files next to the executable's working directory.
//!
//! Playback is fire-and-forget. A cue that fails to load (no output device,
//! missing file, unreadable format) is logged and stays silent; the game
//! never stops because of audio.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// Relative path of the cue played when food is eaten
pub const EAT_SOUND_PATH: &str = "eat_sound.wav";
/// Relative path of the cue played when the game ends
pub const GAME_OVER_SOUND_PATH: &str = "game_over_sound.wav";

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Snake ate food
    Eat,
    /// Snake crashed (or the board was cleared)
    GameOver,
}

/// A decoded-once cue: raw file bytes plus the sink that plays them
struct LoadedCue {
    bytes: Arc<[u8]>,
    sink: Sink,
}

impl LoadedCue {
    /// Restart the cue from its first frame
    fn restart(&self) -> Result<()> {
        let source = Decoder::new(Cursor::new(Arc::clone(&self.bytes)))
            .context("Failed to decode sound cue")?;
        self.sink.clear();
        self.sink.append(source);
        self.sink.play();
        Ok(())
    }
}

/// Audio manager for the game
pub struct SoundBoard {
    // Dropping the stream silences every sink, so it lives as long as the board
    _stream: Option<OutputStream>,
    eat: Option<LoadedCue>,
    game_over: Option<LoadedCue>,
}

impl SoundBoard {
    /// A board with no output at all
    pub fn silent() -> Self {
        Self {
            _stream: None,
            eat: None,
            game_over: None,
        }
    }

    /// Load both cues from their fixed relative paths
    pub fn load_default() -> Self {
        Self::load(Path::new(EAT_SOUND_PATH), Path::new(GAME_OVER_SOUND_PATH))
    }

    /// Open the default output device and load both cues.
    ///
    /// Failures are logged and degrade to silence for the affected cue.
    pub fn load(eat_path: &Path, game_over_path: &Path) -> Self {
        let (stream, handle) = match OutputStream::try_default() {
            Ok(output) => output,
            Err(err) => {
                log::warn!("No audio output device, sound disabled: {err}");
                return Self::silent();
            }
        };

        let eat = load_cue(&handle, SoundCue::Eat, eat_path);
        let game_over = load_cue(&handle, SoundCue::GameOver, game_over_path);

        Self {
            _stream: Some(stream),
            eat,
            game_over,
        }
    }

    /// Whether a cue will make any sound
    pub fn is_enabled(&self, cue: SoundCue) -> bool {
        self.cue(cue).is_some()
    }

    /// Play a cue from the start without waiting for it
    pub fn play(&self, cue: SoundCue) {
        let Some(loaded) = self.cue(cue) else {
            return;
        };

        if let Err(err) = loaded.restart() {
            log::warn!("Could not play {cue:?}: {err:#}");
        }
    }

    fn cue(&self, cue: SoundCue) -> Option<&LoadedCue> {
        match cue {
            SoundCue::Eat => self.eat.as_ref(),
            SoundCue::GameOver => self.game_over.as_ref(),
        }
    }
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self::silent()
    }
}

fn load_cue(handle: &OutputStreamHandle, cue: SoundCue, path: &Path) -> Option<LoadedCue> {
    let loaded = read_cue_bytes(path).and_then(|bytes| {
        let sink = Sink::try_new(handle).context("Failed to create audio sink")?;
        Ok(LoadedCue { bytes, sink })
    });

    match loaded {
        Ok(loaded) => {
            log::info!("Loaded {cue:?} sound from {}", path.display());
            Some(loaded)
        }
        Err(err) => {
            log::warn!("{cue:?} sound disabled: {err:#}");
            None
        }
    }
}

/// Read a cue file and check that it decodes
fn read_cue_bytes(path: &Path) -> Result<Arc<[u8]>> {
    let bytes: Arc<[u8]> = fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .into();

    Decoder::new(Cursor::new(Arc::clone(&bytes)))
        .with_context(|| format!("Unsupported audio format in {}", path.display()))?;

    Ok(bytes)
}
