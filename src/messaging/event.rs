// Click events - UI thread -> audio callback

use crate::audio::click::ClickType;

/// A click committed to the audio path at an absolute stream sample
#[derive(Debug, Clone, Copy)]
pub struct ClickEvent {
    pub click: ClickType,
    pub start_sample: u64,
}
