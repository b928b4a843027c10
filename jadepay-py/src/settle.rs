//! Free settlement functions taking and returning plain Python lists.
//!
//! Lists are length-checked on the way in; a wrong length or an out-of-range
//! seat raises `ValueError` instead of touching the wrong score.

use pyo3::prelude::*;

use jadepay_engine::settlement::DEFAULT_PENALTY_PER_PAIR;
use jadepay_engine::summary::payment_summary_from_slices;
use jadepay_engine::{self as engine, ScoreVector, Seat, SeatFlags};

fn scores_in(scores: &[i32]) -> PyResult<ScoreVector> {
    Ok(ScoreVector::from_slice(scores)?)
}

fn flags_in(flags: &[bool]) -> PyResult<SeatFlags> {
    Ok(SeatFlags::from_slice(flags)?)
}

#[pyfunction]
#[pyo3(signature = (fan, base_unit=engine::DEFAULT_BASE_UNIT))]
fn fan_to_points(fan: i32, base_unit: u32) -> u32 {
    engine::fan_to_points(fan, base_unit)
}

#[pyfunction]
fn settle_ron(scores: Vec<i32>, winner: u8, discarder: u8, points: u32) -> PyResult<Vec<i32>> {
    let next = engine::settle_ron(
        &scores_in(&scores)?,
        Seat::new(winner)?,
        Seat::new(discarder)?,
        points,
    )?;
    Ok(next.into_array().to_vec())
}

#[pyfunction]
fn settle_tsumo(scores: Vec<i32>, winner: u8, points: u32) -> PyResult<Vec<i32>> {
    let next = engine::settle_tsumo(&scores_in(&scores)?, Seat::new(winner)?, points)?;
    Ok(next.into_array().to_vec())
}

#[pyfunction]
fn settle_sichuan_ron(
    scores: Vec<i32>,
    winner: u8,
    discarder: u8,
    points: u32,
) -> PyResult<Vec<i32>> {
    let next = engine::settle_sichuan_ron(
        &scores_in(&scores)?,
        Seat::new(winner)?,
        Seat::new(discarder)?,
        points,
    )?;
    Ok(next.into_array().to_vec())
}

#[pyfunction]
fn settle_sichuan_tsumo(
    scores: Vec<i32>,
    winner: u8,
    points: u32,
    has_won: Vec<bool>,
) -> PyResult<Vec<i32>> {
    let next = engine::settle_sichuan_tsumo(
        &scores_in(&scores)?,
        Seat::new(winner)?,
        points,
        &flags_in(&has_won)?,
    )?;
    Ok(next.into_array().to_vec())
}

#[pyfunction]
#[pyo3(signature = (scores, tenpai, penalty_per_pair=DEFAULT_PENALTY_PER_PAIR))]
fn settle_draw_game(
    scores: Vec<i32>,
    tenpai: Vec<bool>,
    penalty_per_pair: u32,
) -> PyResult<Vec<i32>> {
    let next =
        engine::settle_draw_game(&scores_in(&scores)?, &flags_in(&tenpai)?, penalty_per_pair)?;
    Ok(next.into_array().to_vec())
}

#[pyfunction]
fn format_delta(delta: i64) -> String {
    engine::format_delta(delta)
}

/// Returns `[(name, delta), ...]` in seat order.
#[pyfunction]
fn payment_summary(
    before: Vec<i32>,
    after: Vec<i32>,
    names: Vec<String>,
) -> PyResult<Vec<(String, i64)>> {
    let lines = payment_summary_from_slices(&before, &after, names.as_slice())?;
    Ok(lines.into_iter().map(|l| (l.name, l.delta)).collect())
}

pub(crate) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(fan_to_points, m)?)?;
    m.add_function(wrap_pyfunction!(settle_ron, m)?)?;
    m.add_function(wrap_pyfunction!(settle_tsumo, m)?)?;
    m.add_function(wrap_pyfunction!(settle_sichuan_ron, m)?)?;
    m.add_function(wrap_pyfunction!(settle_sichuan_tsumo, m)?)?;
    m.add_function(wrap_pyfunction!(settle_draw_game, m)?)?;
    m.add_function(wrap_pyfunction!(format_delta, m)?)?;
    m.add_function(wrap_pyfunction!(payment_summary, m)?)?;
    Ok(())
}
