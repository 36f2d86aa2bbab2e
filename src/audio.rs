//! Background music.
//!
//! The game logic never sees audio. The host drives [`BackgroundMusic`] from
//! lifecycle events (page hidden / shown / unloaded) and the mute button; the
//! actual playback sits behind [`MusicPlayer`].

/// Playback primitives of a looping track.
pub trait MusicPlayer {
    fn start(&mut self);
    fn pause(&mut self);
    fn release(&mut self);
}

/// Mute flag plus lifecycle rules around a [`MusicPlayer`].
pub struct BackgroundMusic<P: MusicPlayer> {
    player: P,
    muted: bool,
    released: bool,
}

impl<P: MusicPlayer> BackgroundMusic<P> {
    /// Take ownership of the player and start the loop.
    pub fn new(mut player: P) -> Self {
        player.start();
        Self {
            player,
            muted: false,
            released: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Host went to background.
    pub fn on_pause(&mut self) {
        if !self.released {
            self.player.pause();
        }
    }

    /// Host came back; music only resumes if the player did not mute it.
    pub fn on_resume(&mut self) {
        if !self.released && !self.muted {
            self.player.start();
        }
    }

    /// Flip the mute flag. Returns the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if !self.released {
            if self.muted {
                self.player.pause();
            } else {
                self.player.start();
            }
        }
        log::debug!("music muted: {}", self.muted);
        self.muted
    }

    /// Free the player. Later calls are ignored.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.player.release();
        }
    }

    #[cfg(test)]
    pub fn player(&self) -> &P {
        &self.player
    }
}

impl<P: MusicPlayer> Drop for BackgroundMusic<P> {
    fn drop(&mut self) {
        self.release();
    }
}

/// `<audio loop>` element player for the browser build.
pub struct HtmlAudioPlayer {
    element: Option<web_sys::HtmlAudioElement>,
}

impl HtmlAudioPlayer {
    /// Create a looping audio element for `src`. Audio is simply disabled
    /// when the element cannot be created.
    pub fn new(src: &str) -> Self {
        let element = match web_sys::HtmlAudioElement::new_with_src(src) {
            Ok(el) => {
                el.set_loop(true);
                Some(el)
            }
            Err(e) => {
                log::warn!("failed to create audio element, music disabled: {e:?}");
                None
            }
        };
        Self { element }
    }
}

impl MusicPlayer for HtmlAudioPlayer {
    fn start(&mut self) {
        if let Some(el) = &self.element {
            let promise = match el.play() {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("music playback failed: {e:?}");
                    return;
                }
            };
            // Autoplay policy refusals arrive as a rejected promise.
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    log::warn!("music playback refused: {e:?}");
                }
            });
        }
    }

    fn pause(&mut self) {
        if let Some(el) = &self.element {
            let _ = el.pause();
        }
    }

    fn release(&mut self) {
        if let Some(el) = self.element.take() {
            let _ = el.pause();
            el.set_src("");
        }
    }
}

/// Player double that records what it was asked to do.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingPlayer {
    pub playing: bool,
    pub starts: u32,
    pub pauses: u32,
    pub releases: u32,
}

#[cfg(test)]
impl MusicPlayer for RecordingPlayer {
    fn start(&mut self) {
        self.playing = true;
        self.starts += 1;
    }

    fn pause(&mut self) {
        self.playing = false;
        self.pauses += 1;
    }

    fn release(&mut self) {
        self.playing = false;
        self.releases += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_playing_on_creation() {
        let music = BackgroundMusic::new(RecordingPlayer::default());
        assert!(music.player().playing);
        assert!(!music.is_muted());
    }

    #[test]
    fn pause_and_resume_follow_lifecycle() {
        let mut music = BackgroundMusic::new(RecordingPlayer::default());
        music.on_pause();
        assert!(!music.player().playing);
        music.on_resume();
        assert!(music.player().playing);
    }

    #[test]
    fn muted_music_stays_silent_on_resume() {
        let mut music = BackgroundMusic::new(RecordingPlayer::default());
        assert!(music.toggle_mute());
        assert!(!music.player().playing);
        music.on_pause();
        music.on_resume();
        assert!(!music.player().playing);

        assert!(!music.toggle_mute());
        assert!(music.player().playing);
    }

    #[test]
    fn release_is_idempotent() {
        let mut music = BackgroundMusic::new(RecordingPlayer::default());
        music.release();
        music.release();
        music.on_resume();
        music.toggle_mute();
        assert_eq!(music.player().releases, 1);
        assert_eq!(music.player().starts, 1);
    }
}
