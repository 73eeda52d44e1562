use genesis_v::math::{self, Mat4};

fn assert_close(a: &[f32], b: &[f32]) {
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!((x - y).abs() < 1e-5, "element {i}: {x} vs {y}");
    }
}

fn sample() -> Mat4 {
    let mut m = math::translation(1.0, -2.0, 3.5);
    math::post_multiply(&mut m, &math::rotation_y(30.0));
    math::post_multiply(&mut m, &math::rotation_x(-75.0));
    m
}

#[test]
fn identity_is_neutral_on_both_sides() {
    let a = sample();
    let i = math::identity();
    assert_close(&math::multiply(&i, &a), &a);
    assert_close(&math::multiply(&a, &i), &a);
}

#[test]
fn accumulating_in_place_matches_a_fresh_product() {
    let a = sample();
    let b = math::rotation_z(42.0);
    let expected = math::multiply(&a, &b);
    let mut aliased = a;
    math::post_multiply(&mut aliased, &b);
    assert_close(&aliased, &expected);
}

#[test]
fn zero_and_full_turns_are_identity() {
    let i = math::identity();
    assert_close(&math::rotation_x(0.0), &i);
    assert_close(&math::rotation_y(0.0), &i);
    assert_close(&math::rotation_z(0.0), &i);
    assert_close(&math::rotation_y(360.0), &i);
}

#[test]
fn translation_moves_points() {
    let p = math::transform_point(&math::translation(0.0, 0.0, -6.0), [1.0, 2.0, 3.0]);
    assert_close(&p, &[1.0, 2.0, -3.0, 1.0]);
}

#[test]
fn orthographic_maps_the_half_extents_to_the_corners() {
    let (half_height, aspect) = (2.0, 4.0 / 3.0);
    let half_width = half_height * aspect;
    let m = math::orthographic(half_height, aspect, -1.0, 1.0);
    let top_right = math::transform_point(&m, [half_width, half_height, 0.0]);
    let bottom_left = math::transform_point(&m, [-half_width, -half_height, 0.0]);
    assert_close(&top_right[..2], &[1.0, 1.0]);
    assert_close(&bottom_left[..2], &[-1.0, -1.0]);
}

#[test]
fn perspective_projects_the_near_plane_to_minus_one() {
    let m = math::perspective(45f32.to_radians(), 1.0, 0.1, 100.0);
    let p = math::transform_point(&m, [0.0, 0.0, -0.1]);
    assert!((p[2] / p[3] + 1.0).abs() < 1e-4);
}
