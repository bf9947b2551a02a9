//! Slide carousel navigation and gesture state machine.
//!
//! Every input channel (touch/drag, keyboard, tap zones, progress dots) is
//! expressed as one [`CarouselInput`] and consumed by [`Carousel::apply`].
//!
//! ```text
//! Idle(i)              --touch_start(x)--> Dragging(i, x, 0)
//! Dragging(i, s, _)    --touch_move(x)---> Dragging(i, s, damp(s - x))
//! Dragging(i, s, off)  --touch_end-------> Idle(i ± 1 if |off| > min else i)
//! Dragging(i, ..)      --touch_cancel----> Idle(i)
//! Idle(i)              --next / prev-----> Idle(clamp(i ± 1))
//! Idle(i)              --dot(j)----------> Idle(j)
//! Idle(i)              --tap(zone)-------> Idle(clamp(i ∓ 1)) | no-op in the middle
//! ```
//!
//! The index never wraps and never leaves `[0, slide_count - 1]`.

/// Minimum drag distance, in pixels, that commits a swipe.
pub const MIN_SWIPE_DISTANCE: f32 = 50.0;

/// Scale applied to a drag that would move past the first or last slide.
pub const EDGE_DAMPING: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselConfig {
    pub min_swipe_distance: f32,
    pub edge_damping: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            min_swipe_distance: MIN_SWIPE_DISTANCE,
            edge_damping: EDGE_DAMPING,
        }
    }
}

/// Gesture phase of the carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging { start_x: f32 },
}

/// Horizontal thirds of the viewport used for tap navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapZone {
    Left,
    Middle,
    Right,
}

impl TapZone {
    /// Locate a tap at `x` within a viewport `width` pixels wide.
    pub fn locate(x: f32, width: f32) -> Self {
        if !width.is_finite() || width <= 0.0 || !x.is_finite() {
            return TapZone::Middle;
        }
        let third = width / 3.0;
        if x < third {
            TapZone::Left
        } else if x >= width - third {
            TapZone::Right
        } else {
            TapZone::Middle
        }
    }
}

/// One input event from any channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselInput {
    TouchStart { x: f32 },
    TouchMove { x: f32 },
    TouchEnd,
    TouchCancel,
    Next,
    Prev,
    DotClick(usize),
    Tap(TapZone),
}

/// Fill state of one progress segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Filled,
    Active,
    Empty,
}

/// A committed index change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    slide_count: usize,
    index: usize,
    drag_offset: f32,
    gesture: Gesture,
    config: CarouselConfig,
}

impl Carousel {
    pub fn new(slide_count: usize) -> Self {
        Self::with_config(slide_count, CarouselConfig::default())
    }

    pub fn with_config(slide_count: usize, config: CarouselConfig) -> Self {
        Self {
            slide_count,
            index: 0,
            drag_offset: 0.0,
            gesture: Gesture::Idle,
            config,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn is_empty(&self) -> bool {
        self.slide_count == 0
    }

    /// Signed drag delta in pixels. Positive means the strip is pulled toward the next slide.
    pub fn drag_offset(&self) -> f32 {
        self.drag_offset
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn config(&self) -> CarouselConfig {
        self.config
    }

    fn last(&self) -> usize {
        self.slide_count.saturating_sub(1)
    }

    /// Feed one input through the transition table.
    /// Returns the index change, if the input committed one.
    pub fn apply(&mut self, input: CarouselInput) -> Option<Navigation> {
        if self.slide_count == 0 {
            return None;
        }

        match (self.gesture, input) {
            (_, CarouselInput::TouchStart { x }) => {
                if x.is_finite() {
                    self.gesture = Gesture::Dragging { start_x: x };
                    self.drag_offset = 0.0;
                }
                None
            }
            (Gesture::Dragging { start_x }, CarouselInput::TouchMove { x }) => {
                if x.is_finite() {
                    self.drag_offset = self.damp(start_x - x);
                }
                None
            }
            (Gesture::Dragging { .. }, CarouselInput::TouchEnd) => {
                let offset = self.drag_offset;
                self.end_drag();
                self.settle(offset)
            }
            (Gesture::Dragging { .. }, CarouselInput::TouchCancel) => {
                self.end_drag();
                None
            }
            // Touch continuation without a touch start.
            (Gesture::Idle, CarouselInput::TouchMove { .. })
            | (Gesture::Idle, CarouselInput::TouchEnd)
            | (Gesture::Idle, CarouselInput::TouchCancel) => None,
            // Discrete navigation is only honored between gestures.
            (Gesture::Dragging { .. }, _) => None,
            (Gesture::Idle, CarouselInput::Next) => self.go_to(self.index + 1),
            (Gesture::Idle, CarouselInput::Prev) => self.go_to(self.index.saturating_sub(1)),
            (Gesture::Idle, CarouselInput::DotClick(j)) => {
                if j < self.slide_count {
                    self.go_to(j)
                } else {
                    None
                }
            }
            (Gesture::Idle, CarouselInput::Tap(zone)) => match zone {
                TapZone::Left => self.go_to(self.index.saturating_sub(1)),
                TapZone::Right => self.go_to(self.index + 1),
                TapZone::Middle => None,
            },
        }
    }

    /// Attenuate drags that point past either end of the sequence.
    fn damp(&self, raw: f32) -> f32 {
        let past_last = raw > 0.0 && self.index == self.last();
        let past_first = raw < 0.0 && self.index == 0;
        if past_last || past_first {
            raw * self.config.edge_damping
        } else {
            raw
        }
    }

    fn end_drag(&mut self) {
        self.gesture = Gesture::Idle;
        self.drag_offset = 0.0;
    }

    fn settle(&mut self, offset: f32) -> Option<Navigation> {
        if offset.abs() <= self.config.min_swipe_distance {
            return None;
        }
        if offset > 0.0 && self.index < self.last() {
            self.go_to(self.index + 1)
        } else if offset < 0.0 && self.index > 0 {
            self.go_to(self.index - 1)
        } else {
            None
        }
    }

    fn go_to(&mut self, target: usize) -> Option<Navigation> {
        let to = target.min(self.last());
        if to == self.index {
            return None;
        }
        let nav = Navigation {
            from: self.index,
            to,
        };
        self.index = to;
        Some(nav)
    }

    pub fn can_go_prev(&self) -> bool {
        self.slide_count > 0 && self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.slide_count > 0 && self.index < self.last()
    }

    /// The swipe hint is shown only on the first slide.
    pub fn show_swipe_hint(&self) -> bool {
        self.slide_count > 0 && self.index == 0
    }

    /// One segment per slide: filled before the current index, active at it, empty after.
    pub fn segments(&self) -> Vec<Segment> {
        (0..self.slide_count)
            .map(|i| match i.cmp(&self.index) {
                std::cmp::Ordering::Less => Segment::Filled,
                std::cmp::Ordering::Equal => Segment::Active,
                std::cmp::Ordering::Greater => Segment::Empty,
            })
            .collect()
    }

    /// Horizontal offset of the slide strip for a viewport `viewport_width` pixels wide.
    pub fn translate_x(&self, viewport_width: f32) -> f32 {
        -(self.index as f32 * viewport_width) - self.drag_offset
    }
}
