//! Terminal rendering of trajectories: a character grid with one marker
//! per species, the way a plotting backend would overlay one line per
//! compartment.

use crate::simulator::Trajectory;
use crate::utils::errors::SimulationError;

const MARKERS: &[char] = &['*', '+', 'o', 'x', '#', '@', '%', '&'];

/// Render a trajectory as an ASCII chart, `width` columns by `height`
/// rows of plotting area.  The y axis runs from zero to the largest value
/// of any species; the x axis spans the recorded times.
pub fn ascii_chart(
    trajectory: &Trajectory,
    width: usize,
    height: usize,
) -> Result<String, SimulationError> {
    let (start, end) = match (trajectory.times().first(), trajectory.times().last()) {
        (Some(start), Some(end)) => (*start, *end),
        _ => return Err(SimulationError::EmptySample),
    };
    let (width, height) = (width.max(2), height.max(2));
    let top = trajectory
        .states()
        .iter()
        .flat_map(|state| state.iter().copied())
        .fold(0.0f64, f64::max);
    let top = if top > 0.0 { top } else { 1.0 };

    let mut grid = vec![vec![' '; width]; height];
    for column in 0..width {
        let time = start + (end - start) * column as f64 / (width - 1) as f64;
        let state = trajectory.state_at(time)?;
        for (index, value) in state.iter().enumerate() {
            let row = ((value.max(0.0) / top) * (height - 1) as f64).round() as usize;
            grid[height - 1 - row.min(height - 1)][column] = MARKERS[index % MARKERS.len()];
        }
    }

    let label_width = format!("{:.0}", top).len().max(1);
    let mut chart = String::new();
    for (row, cells) in grid.iter().enumerate() {
        let label = if row == 0 {
            format!("{:>w$.0}", top, w = label_width)
        } else if row == height - 1 {
            format!("{:>w$}", 0, w = label_width)
        } else {
            " ".repeat(label_width)
        };
        chart.push_str(&label);
        chart.push_str(" |");
        chart.extend(cells.iter());
        chart.push('\n');
    }
    chart.push_str(&" ".repeat(label_width));
    chart.push_str(" +");
    chart.push_str(&"-".repeat(width));
    chart.push('\n');
    let start_label = format!("{}", start);
    let end_label = format!("{}", end);
    let gap = (width + 2).saturating_sub(start_label.len() + end_label.len());
    chart.push_str(&" ".repeat(label_width));
    chart.push_str(&start_label);
    chart.push_str(&" ".repeat(gap));
    chart.push_str(&end_label);
    chart.push('\n');
    let legend: Vec<String> = trajectory
        .species()
        .iter()
        .enumerate()
        .map(|(index, name)| format!("{} {}", MARKERS[index % MARKERS.len()], name))
        .collect();
    chart.push_str(&" ".repeat(label_width + 2));
    chart.push_str(&legend.join("  "));
    chart.push('\n');
    Ok(chart)
}
