// Scroll- and time-driven animation state shared by the page sections.
// Everything in this module is plain data: the DOM glue in frontend.rs feeds
// in scroll offsets, input deltas, and timestamps, and reads back derived
// values. Keeping the platform out of here is what makes these testable on
// the host.

/// Milliseconds of upward-scroll silence before the navbar hides again.
pub const NAV_HIDE_DELAY_MS: f64 = 3_000.0;

/// Marquee track speed in CSS pixels per second.
pub const MARQUEE_SPEED: f64 = 80.0;

const TYPE_DELAY_MS: f64 = 60.0;
const DELETE_DELAY_MS: f64 = 40.0;
const HOLD_DELAY_MS: f64 = 1_200.0;

pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Progress through a scroll scene bounded by "scene top meets viewport top"
/// (0.0) and "scene bottom meets viewport bottom" (1.0).
///
/// `scene_top` is the scene's bounding-rect top relative to the viewport, so
/// it runs negative as the page scrolls past. Overscroll clamps to [0, 1].
pub fn scene_progress(scene_top: f64, scene_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scene_height - viewport_height;
    if scrollable <= 0.0 {
        // Degenerate scene: both anchors coincide, so progress snaps.
        return if scene_top < 0.0 { 1.0 } else { 0.0 };
    }

    clamp01(-scene_top / scrollable)
}

/// Local progress of item `index` when [0, 1] is split into `count` equal
/// windows. Values outside the item's window clamp to 0 or 1.
pub fn segment_progress(progress: f64, index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }

    let span = 1.0 / count as f64;
    let start = index as f64 * span;
    clamp01((progress - start) / span)
}

/// Which of `count` equal segments owns `progress`. A shared boundary belongs
/// to the earlier segment: the result is the smallest `i` with
/// `progress <= (i + 1) / count`.
pub fn active_index(progress: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }

    let count_f = count as f64;
    for index in 0..count {
        if progress <= (index + 1) as f64 / count_f {
            return index;
        }
    }

    count - 1
}

/// Interpolated presentation of one scroll-scene item at a given local
/// progress: fade in, grow from 0.8x, and rise from 40px below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemVisual {
    pub opacity: f64,
    pub scale: f64,
    pub translate_y: f64,
}

impl ItemVisual {
    pub fn at(local_progress: f64) -> Self {
        let t = clamp01(local_progress);

        Self {
            opacity: lerp(0.0, 1.0, t),
            scale: lerp(0.8, 1.0, t),
            translate_y: lerp(40.0, 0.0, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealState {
    ForcedVisible,
    VisibleTransient,
    Hidden,
}

/// Navbar show/hide controller.
///
/// While the home section intersects the viewport the bar is pinned visible.
/// Elsewhere, scrolling down hides it and scrolling up shows it transiently,
/// arming a hide deadline that every further upward tick re-arms. The caller
/// owns the clock: timestamps are milliseconds from any monotonic-enough
/// source, and `tick` is expected once the armed deadline passes.
#[derive(Debug)]
pub struct NavReveal {
    state: RevealState,
    last_scroll_y: f64,
    hide_deadline: Option<f64>,
    hide_delay_ms: f64,
}

impl NavReveal {
    pub fn new() -> Self {
        // The home section is on screen at load.
        Self {
            state: RevealState::ForcedVisible,
            last_scroll_y: 0.0,
            hide_deadline: None,
            hide_delay_ms: NAV_HIDE_DELAY_MS,
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, RevealState::Hidden)
    }

    /// Deadline (same clock as `on_scroll`/`tick`) at which the bar will hide
    /// unless re-armed, if one is pending.
    pub fn hide_deadline(&self) -> Option<f64> {
        self.hide_deadline
    }

    pub fn set_home_visible(&mut self, home_visible: bool) {
        if home_visible {
            self.state = RevealState::ForcedVisible;
            self.hide_deadline = None;
        } else if self.state == RevealState::ForcedVisible {
            // Leaving home only drops the pin; the next scroll tick decides.
            self.state = RevealState::VisibleTransient;
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f64, now_ms: f64) {
        let previous_y = std::mem::replace(&mut self.last_scroll_y, scroll_y);

        if self.state == RevealState::ForcedVisible {
            return;
        }

        if scroll_y > previous_y {
            self.state = RevealState::Hidden;
            self.hide_deadline = None;
        } else if scroll_y < previous_y {
            self.state = RevealState::VisibleTransient;
            self.hide_deadline = Some(now_ms + self.hide_delay_ms);
        }
    }

    pub fn tick(&mut self, now_ms: f64) {
        if self.state != RevealState::VisibleTransient {
            return;
        }

        if let Some(deadline) = self.hide_deadline {
            if now_ms >= deadline {
                self.state = RevealState::Hidden;
                self.hide_deadline = None;
            }
        }
    }
}

impl Default for NavReveal {
    fn default() -> Self {
        Self::new()
    }
}

/// Discrete marquee direction derived from wheel and touch input.
///
/// -1.0 advances the track forward (content drifts left), +1.0 reverses it.
/// Wheel direction comes straight from the sign of `deltaY`; touch direction
/// from the sign of consecutive touch-move deltas, where the first sample of
/// a gesture only records a reference point. A zero delta changes nothing.
#[derive(Debug)]
pub struct MarqueeDirection {
    direction: f64,
    last_touch_y: Option<f64>,
}

impl MarqueeDirection {
    pub fn new() -> Self {
        Self {
            direction: -1.0,
            last_touch_y: None,
        }
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn on_wheel(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.direction = -1.0;
        } else if delta_y < 0.0 {
            self.direction = 1.0;
        }
    }

    pub fn on_touch_start(&mut self, client_y: f64) {
        self.last_touch_y = Some(client_y);
    }

    pub fn on_touch_move(&mut self, client_y: f64) {
        let Some(previous_y) = self.last_touch_y.replace(client_y) else {
            return;
        };

        let delta = client_y - previous_y;
        if delta > 0.0 {
            self.direction = 1.0;
        } else if delta < 0.0 {
            self.direction = -1.0;
        }
    }

    pub fn on_touch_end(&mut self) {
        self.last_touch_y = None;
    }
}

impl Default for MarqueeDirection {
    fn default() -> Self {
        Self::new()
    }
}

/// Track offset for the seamless skills marquee.
///
/// The track renders its content twice, so one loop period is half the track
/// width and the canonical offset range is [-loop_length, 0).
#[derive(Debug)]
pub struct Marquee {
    position: f64,
    speed: f64,
}

impl Marquee {
    pub fn new(speed: f64) -> Self {
        Self {
            position: 0.0,
            speed,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Advance by one frame and return the wrapped offset. `dt_seconds` is
    /// wall-clock time since the previous frame; a backgrounded tab can make
    /// it arbitrarily large, so the wrap is modular rather than a single
    /// add/subtract.
    pub fn advance(&mut self, direction: f64, dt_seconds: f64, loop_length: f64) -> f64 {
        self.position += self.speed * direction * dt_seconds;

        if loop_length > 0.0 && (self.position <= -loop_length || self.position >= 0.0) {
            self.position = self.position.rem_euclid(loop_length) - loop_length;
        }

        self.position
    }
}

/// Step machine behind the hero typewriter line: type a role out, hold,
/// delete it, move to the next role, wrap around.
#[derive(Debug)]
pub struct TypingCycle {
    roles: Vec<String>,
    role_index: usize,
    visible_chars: usize,
    deleting: bool,
}

impl TypingCycle {
    pub fn new(roles: Vec<String>) -> Self {
        Self {
            roles,
            role_index: 0,
            visible_chars: 0,
            deleting: false,
        }
    }

    /// Currently visible prefix of the active role.
    pub fn current_text(&self) -> &str {
        let Some(role) = self.roles.get(self.role_index) else {
            return "";
        };

        let end = role
            .char_indices()
            .nth(self.visible_chars)
            .map(|(byte_index, _)| byte_index)
            .unwrap_or(role.len());
        &role[..end]
    }

    /// Apply one step and return the delay in milliseconds until the next.
    pub fn step(&mut self) -> f64 {
        let Some(role_len) = self.roles.get(self.role_index).map(|role| role.chars().count())
        else {
            return HOLD_DELAY_MS;
        };

        if !self.deleting {
            if self.visible_chars < role_len {
                self.visible_chars += 1;
                return if self.visible_chars == role_len {
                    // Word complete: hold before deleting.
                    self.deleting = true;
                    HOLD_DELAY_MS
                } else {
                    TYPE_DELAY_MS
                };
            }

            self.deleting = true;
            return HOLD_DELAY_MS;
        }

        if self.visible_chars > 0 {
            self.visible_chars -= 1;
            return DELETE_DELAY_MS;
        }

        self.deleting = false;
        self.role_index = (self.role_index + 1) % self.roles.len();
        TYPE_DELAY_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f64 = 800.0;

    #[test]
    fn scene_progress_is_zero_at_start_anchor_and_one_at_end_anchor() {
        let scene_height = 2_400.0;

        assert_eq!(scene_progress(0.0, scene_height, VIEWPORT), 0.0);
        assert_eq!(
            scene_progress(-(scene_height - VIEWPORT), scene_height, VIEWPORT),
            1.0
        );
    }

    #[test]
    fn scene_progress_clamps_past_both_boundaries() {
        let scene_height = 2_400.0;

        assert_eq!(scene_progress(250.0, scene_height, VIEWPORT), 0.0);
        assert_eq!(scene_progress(-5_000.0, scene_height, VIEWPORT), 1.0);
    }

    #[test]
    fn scene_progress_is_a_continuous_pixel_ratio() {
        let scene_height = 1_800.0;
        let scrollable = scene_height - VIEWPORT;

        let halfway = scene_progress(-scrollable / 2.0, scene_height, VIEWPORT);
        assert!((halfway - 0.5).abs() < 1e-12);
    }

    #[test]
    fn scene_no_taller_than_viewport_snaps_between_endpoints() {
        assert_eq!(scene_progress(10.0, VIEWPORT, VIEWPORT), 0.0);
        assert_eq!(scene_progress(-10.0, VIEWPORT, VIEWPORT), 1.0);
    }

    #[test]
    fn segments_after_progress_report_zero_and_before_report_one() {
        let count = 5;

        for step in 0..=100 {
            let progress = step as f64 / 100.0;

            for index in 0..count {
                let window_start = index as f64 / count as f64;
                let window_end = (index + 1) as f64 / count as f64;
                let local = segment_progress(progress, index, count);

                if window_start >= progress {
                    assert_eq!(local, 0.0, "window after p={progress} index={index}");
                }
                if window_end <= progress {
                    assert_eq!(local, 1.0, "window before p={progress} index={index}");
                }
            }
        }
    }

    #[test]
    fn segment_progress_is_monotonic_per_item() {
        let count = 4;

        for index in 0..count {
            let mut previous = 0.0;

            for step in 0..=1_000 {
                let progress = step as f64 / 1_000.0;
                let local = segment_progress(progress, index, count);

                assert!(local >= previous, "regressed at p={progress} index={index}");
                assert!((0.0..=1.0).contains(&local));
                previous = local;
            }
        }
    }

    #[test]
    fn segment_endpoints_cover_all_items() {
        for index in 0..3 {
            assert_eq!(segment_progress(0.0, index, 3), 0.0);
            assert_eq!(segment_progress(1.0, index, 3), 1.0);
        }
    }

    #[test]
    fn active_index_gives_boundaries_to_the_earlier_segment() {
        assert_eq!(active_index(0.0, 2), 0);
        assert_eq!(active_index(0.5, 2), 0);
        assert_eq!(active_index(0.500001, 2), 1);
        assert_eq!(active_index(1.0, 2), 1);
        assert_eq!(active_index(2.0, 3), 2);
    }

    #[test]
    fn nav_hides_after_scrolling_down_away_from_home() {
        let mut nav = NavReveal::new();

        nav.set_home_visible(true);
        nav.on_scroll(100.0, 0.0);
        assert!(nav.is_visible(), "pinned while home intersects");

        nav.set_home_visible(false);
        nav.on_scroll(200.0, 10.0);
        assert!(!nav.is_visible());
    }

    #[test]
    fn upward_ticks_keep_rearming_the_hide_deadline() {
        let mut nav = NavReveal::new();
        nav.set_home_visible(false);

        nav.on_scroll(500.0, 0.0);
        assert!(!nav.is_visible(), "downward scroll hides first");

        nav.on_scroll(400.0, 100.0);
        assert!(nav.is_visible());

        nav.tick(100.0 + 2_999.0);
        assert!(nav.is_visible(), "2999ms is inside the deadline");

        nav.on_scroll(300.0, 3_099.0);
        nav.tick(3_099.0 + 2_999.0);
        assert!(nav.is_visible(), "each upward tick re-arms the deadline");

        nav.tick(3_099.0 + 3_001.0);
        assert!(!nav.is_visible(), "deadline passed with no further input");
    }

    #[test]
    fn entering_home_cancels_a_pending_hide_deadline() {
        let mut nav = NavReveal::new();
        nav.set_home_visible(false);
        nav.on_scroll(500.0, 0.0);
        nav.on_scroll(400.0, 50.0);
        assert!(nav.hide_deadline().is_some());

        nav.set_home_visible(true);
        assert_eq!(nav.hide_deadline(), None);

        nav.tick(1_000_000.0);
        assert!(nav.is_visible(), "forced state ignores stale deadlines");
    }

    #[test]
    fn forced_visibility_ignores_scroll_direction() {
        let mut nav = NavReveal::new();
        nav.set_home_visible(true);

        nav.on_scroll(100.0, 0.0);
        nav.on_scroll(900.0, 10.0);
        assert!(nav.is_visible());
    }

    #[test]
    fn wheel_sign_maps_to_direction() {
        let mut input = MarqueeDirection::new();

        input.on_wheel(50.0);
        assert_eq!(input.direction(), -1.0);

        input.on_wheel(-50.0);
        assert_eq!(input.direction(), 1.0);

        input.on_wheel(0.0);
        assert_eq!(input.direction(), 1.0, "zero delta changes nothing");
    }

    #[test]
    fn first_touch_sample_only_records_a_reference() {
        let mut input = MarqueeDirection::new();
        let initial = input.direction();

        input.on_touch_start(300.0);
        assert_eq!(input.direction(), initial);

        input.on_touch_move(340.0);
        assert_eq!(input.direction(), 1.0, "finger moving down reverses");

        input.on_touch_move(310.0);
        assert_eq!(input.direction(), -1.0);
    }

    #[test]
    fn touch_move_without_reference_is_inert() {
        let mut input = MarqueeDirection::new();
        let initial = input.direction();

        input.on_touch_move(340.0);
        assert_eq!(input.direction(), initial);

        // That stray sample becomes the reference for the next one.
        input.on_touch_move(400.0);
        assert_eq!(input.direction(), 1.0);
    }

    #[test]
    fn marquee_position_stays_inside_one_loop_period() {
        let loop_length = 1_280.0;
        let mut marquee = Marquee::new(MARQUEE_SPEED);
        let mut direction = -1.0;

        for frame in 0..10_000 {
            if frame % 337 == 0 {
                direction = -direction;
            }

            let position = marquee.advance(direction, 0.016, loop_length);
            assert!(
                position >= -loop_length && position < 0.0,
                "drifted to {position} at frame {frame}"
            );
        }
    }

    #[test]
    fn marquee_survives_a_giant_frame_delta() {
        let loop_length = 900.0;
        let mut marquee = Marquee::new(MARQUEE_SPEED);

        // A tab left in the background for an hour.
        let position = marquee.advance(-1.0, 3_600.0, loop_length);
        assert!(position >= -loop_length && position < 0.0);
    }

    #[test]
    fn marquee_without_measured_track_does_not_wrap() {
        let mut marquee = Marquee::new(MARQUEE_SPEED);

        marquee.advance(-1.0, 1.0, 0.0);
        assert_eq!(marquee.position(), -MARQUEE_SPEED);
    }

    #[test]
    fn three_item_scene_reveals_items_in_order() {
        let count = 3;
        let mut revealed_at = vec![None; count];

        for step in 0..=300 {
            let progress = step as f64 / 300.0;
            let opacities: Vec<f64> = (0..count)
                .map(|index| ItemVisual::at(segment_progress(progress, index, count)).opacity)
                .collect();

            // Earlier items are always at least as revealed as later ones.
            for pair in opacities.windows(2) {
                assert!(
                    pair[0] >= pair[1],
                    "out-of-order reveal at p={progress}: {opacities:?}"
                );
            }

            for (index, opacity) in opacities.iter().enumerate() {
                if *opacity >= 1.0 && revealed_at[index].is_none() {
                    revealed_at[index] = Some(progress);
                }
            }
        }

        let reveal_points: Vec<f64> = revealed_at.into_iter().map(Option::unwrap).collect();
        assert!(reveal_points[0] < reveal_points[1]);
        assert!(reveal_points[1] < reveal_points[2]);
        assert_eq!(
            (0..count)
                .map(|index| ItemVisual::at(segment_progress(1.0, index, count)).opacity)
                .collect::<Vec<_>>(),
            vec![1.0; count]
        );
    }

    #[test]
    fn item_visual_interpolates_its_three_channels_independently() {
        let hidden = ItemVisual::at(0.0);
        assert_eq!(hidden.opacity, 0.0);
        assert_eq!(hidden.scale, 0.8);
        assert_eq!(hidden.translate_y, 40.0);

        let halfway = ItemVisual::at(0.5);
        assert!((halfway.opacity - 0.5).abs() < 1e-12);
        assert!((halfway.scale - 0.9).abs() < 1e-12);
        assert!((halfway.translate_y - 20.0).abs() < 1e-12);

        let shown = ItemVisual::at(1.0);
        assert_eq!(shown.opacity, 1.0);
        assert_eq!(shown.scale, 1.0);
        assert_eq!(shown.translate_y, 0.0);

        // Out-of-window inputs clamp.
        assert_eq!(ItemVisual::at(-0.5), hidden);
        assert_eq!(ItemVisual::at(1.5), shown);
    }

    #[test]
    fn typing_cycle_types_holds_deletes_and_advances() {
        let mut cycle = TypingCycle::new(vec!["Ada".to_string(), "Io".to_string()]);
        assert_eq!(cycle.current_text(), "");

        assert_eq!(cycle.step(), TYPE_DELAY_MS);
        assert_eq!(cycle.current_text(), "A");
        assert_eq!(cycle.step(), TYPE_DELAY_MS);
        assert_eq!(cycle.current_text(), "Ad");

        // Completing the word holds before deletion starts.
        assert_eq!(cycle.step(), HOLD_DELAY_MS);
        assert_eq!(cycle.current_text(), "Ada");

        assert_eq!(cycle.step(), DELETE_DELAY_MS);
        assert_eq!(cycle.current_text(), "Ad");
        assert_eq!(cycle.step(), DELETE_DELAY_MS);
        assert_eq!(cycle.step(), DELETE_DELAY_MS);
        assert_eq!(cycle.current_text(), "");

        // Empty again: move on to the next role and wrap later.
        cycle.step();
        assert_eq!(cycle.step(), TYPE_DELAY_MS);
        assert_eq!(cycle.current_text(), "I");
    }

    #[test]
    fn typing_cycle_handles_multibyte_roles() {
        let mut cycle = TypingCycle::new(vec!["नमस्ते".to_string()]);

        cycle.step();
        assert_eq!(cycle.current_text(), "न");
        cycle.step();
        assert_eq!(cycle.current_text(), "नम");
    }
}
