use super::*;

fn timing(audio_us: &[i64]) -> Vec<SlideTiming> {
    audio_us
        .iter()
        .map(|&audio_duration_us| SlideTiming {
            audio_duration_us,
            pan_zoom: Some(KenBurns::full_image(16, 9)),
        })
        .collect()
}

fn three_slides() -> Timeline {
    Timeline::new(
        timing(&[2_000_000, 3_000_000, 1_000_000]),
        500_000,
        1_000_000,
    )
    .unwrap()
}

#[test]
fn rejects_invalid_configuration() {
    assert!(Timeline::new(vec![], 0, 0).is_err());
    assert!(Timeline::new(timing(&[1_000]), -1, 0).is_err());
    assert!(Timeline::new(timing(&[1_000]), 0, -1).is_err());
    assert!(Timeline::new(timing(&[1_000, 0]), 0, 0).is_err());
}

#[test]
fn transition_is_clamped_to_shortest_slide() {
    let tl = Timeline::new(timing(&[300_000, 2_000_000]), 100_000, 1_000_000).unwrap();
    assert_eq!(tl.requested_transition_us(), 1_000_000);
    assert_eq!(tl.transition_us(), 400_000);
    assert_eq!(tl.exclusive_us(0), 0);

    let tl = three_slides();
    assert_eq!(tl.transition_us(), 1_000_000);
}

#[test]
fn durations_follow_transition_accounting() {
    let tl = three_slides();
    assert_eq!(tl.exclusive_us(0), 1_500_000);
    assert_eq!(tl.exclusive_us(1), 2_500_000);
    assert_eq!(tl.exclusive_us(2), 500_000);
    assert_eq!(tl.image_us(1), 5_000_000);
    assert_eq!(tl.trailing_transition_us(-1), 500_000);
    assert_eq!(tl.trailing_transition_us(0), 1_000_000);
    assert_eq!(tl.trailing_transition_us(2), 500_000);
    // Sum of every slide's audio window.
    assert_eq!(tl.total_us(), 7_500_000);
}

#[test]
fn windows_chain_transitions() {
    let w = three_slides().windows();
    assert_eq!(w.len(), 3);
    assert_eq!(
        w[0],
        SlideWindow {
            index: 0,
            visible_start_us: 0,
            start_us: 500_000,
            exclusive_end_us: 2_000_000,
            visible_end_us: 3_000_000,
        }
    );
    assert_eq!(w[1].visible_start_us, w[0].exclusive_end_us);
    assert_eq!(w[1].start_us, 3_000_000);
    assert_eq!(w[2].start_us, 6_500_000);
    assert_eq!(w[2].visible_end_us, 7_500_000);
}

#[test]
fn advance_steps_through_slides() {
    let tl = three_slides();
    let s0 = tl.initial_state();
    assert_eq!(s0.slide_index, -1);
    assert_eq!(s0.next_image_us, 4_000_000);

    let s = advance(&tl, s0, 0);
    assert_eq!(s, s0);
    let s = advance(&tl, s, 500_000);
    assert_eq!(s.slide_index, -1);

    let s = advance(&tl, s, 500_001);
    assert_eq!(s.slide_index, 0);
    assert_eq!(s.slide_start_us, 500_000);
    assert_eq!(s.exclusive_us, 1_500_000);
    assert_eq!(s.current_image_us, 4_000_000);
    assert_eq!(s.next_image_us, 5_000_000);

    let s = advance(&tl, s, 3_000_001);
    assert_eq!(s.slide_index, 1);
    assert_eq!(s.slide_start_us, 3_000_000);
    assert_eq!(s.current_image_us, 5_000_000);
    assert_eq!(s.next_image_us, 3_000_000);

    let s = advance(&tl, s, 7_500_000);
    assert_eq!(s.slide_index, 2);
    assert!(!s.done);

    let s = advance(&tl, s, 7_500_001);
    assert!(s.done);
    assert_eq!(s.slide_index, 3);
}

#[test]
fn advance_can_skip_several_slides_at_once() {
    let tl = three_slides();
    let s = advance(&tl, tl.initial_state(), 6_600_000);
    assert_eq!(s.slide_index, 2);
    assert_eq!(s.slide_start_us, 6_500_000);
    assert_eq!(s.current_image_us, tl.image_us(2));

    let stepwise = [1_000_000, 4_000_000, 6_600_000]
        .into_iter()
        .fold(tl.initial_state(), |s, t| advance(&tl, s, t));
    assert_eq!(s, stepwise);
}

#[test]
fn done_state_is_terminal() {
    let tl = three_slides();
    let done = advance(&tl, tl.initial_state(), i64::MAX / 2);
    assert!(done.done);
    assert_eq!(advance(&tl, done, i64::MAX / 2), done);
    assert_eq!(advance(&tl, done, 0), done);
}

#[test]
fn single_slide_uses_two_half_transitions() {
    let tl = Timeline::new(timing(&[1_000_000]), 0, 400_000).unwrap();
    assert_eq!(tl.trailing_transition_us(-1), 200_000);
    assert_eq!(tl.trailing_transition_us(0), 200_000);
    assert_eq!(tl.total_us(), 600_000 + 400_000);

    let odd = Timeline::new(timing(&[1_000_000]), 0, 333_333).unwrap();
    assert_eq!(odd.total_us(), 666_667 + 2 * 166_666);
}

#[test]
fn durations_that_overflow_are_rejected_up_front() {
    let huge = i64::MAX / 2;
    let err = Timeline::new(timing(&[huge, huge]), 1_000, 1_000).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("overflows"));

    assert!(Timeline::new(timing(&[i64::MAX]), 1, 0).is_err());

    // Largest show that still fits.
    let tl = Timeline::new(timing(&[i64::MAX - 10]), 10, 0).unwrap();
    assert_eq!(tl.total_us(), i64::MAX);
}
