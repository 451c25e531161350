use std::io;

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

/// How states between recorded time points are read from a trajectory.
/// Continuous solutions interpolate linearly; jump process solutions hold
/// the last state until the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interpolation {
    Linear,
    Step,
}

/// A solution: the state of every species at a non-decreasing sequence of
/// time points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trajectory {
    species: Vec<String>,
    interpolation: Interpolation,
    times: Vec<f64>,
    states: Vec<Vec<f64>>,
}

impl Trajectory {
    pub fn new(species: Vec<String>, interpolation: Interpolation) -> Self {
        Self {
            species,
            interpolation,
            times: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Record the state at a time no earlier than the last recorded one.
    pub fn push(&mut self, time: f64, state: &[f64]) {
        self.times.push(time);
        self.states.push(state.to_vec());
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[Vec<f64>] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn final_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    pub fn final_state(&self) -> Option<&[f64]> {
        self.states.last().map(Vec::as_slice)
    }

    fn species_index(&self, name: &str) -> Result<usize, SimulationError> {
        self.species
            .iter()
            .position(|species| species == name)
            .ok_or_else(|| SimulationError::SpeciesNotFound(name.to_string()))
    }

    /// The values of one species over time.
    pub fn series(&self, name: &str) -> Result<Vec<f64>, SimulationError> {
        let index = self.species_index(name)?;
        Ok(self.states.iter().map(|state| state[index]).collect())
    }

    /// The time and value of the maximum of one species.  The earliest
    /// maximum wins ties.
    pub fn peak(&self, name: &str) -> Result<(f64, f64), SimulationError> {
        let index = self.species_index(name)?;
        self.times
            .iter()
            .zip(self.states.iter())
            .map(|(time, state)| (*time, state[index]))
            .fold(None, |peak: Option<(f64, f64)>, (time, value)| match peak {
                Some((_, best)) if best >= value => peak,
                _ => Some((time, value)),
            })
            .ok_or(SimulationError::EmptySample)
    }

    /// The state at an arbitrary time, clamped to the recorded range.
    pub fn state_at(&self, time: f64) -> Result<Vec<f64>, SimulationError> {
        if self.is_empty() {
            return Err(SimulationError::EmptySample);
        }
        let after = self.times.partition_point(|recorded| *recorded <= time);
        if after == 0 {
            return Ok(self.states[0].clone());
        }
        if after == self.times.len() {
            return Ok(self.states[after - 1].clone());
        }
        let (before_time, after_time) = (self.times[after - 1], self.times[after]);
        let (before_state, after_state) = (&self.states[after - 1], &self.states[after]);
        match self.interpolation {
            Interpolation::Step => Ok(before_state.clone()),
            Interpolation::Linear => {
                let weight = if after_time > before_time {
                    (time - before_time) / (after_time - before_time)
                } else {
                    0.0
                };
                Ok(before_state
                    .iter()
                    .zip(after_state.iter())
                    .map(|(a, b)| a + weight * (b - a))
                    .collect())
            }
        }
    }

    /// Resample the trajectory onto the given time points.
    pub fn sample_at(&self, times: &[f64]) -> Result<Trajectory, SimulationError> {
        let mut sampled = Trajectory::new(self.species.clone(), self.interpolation);
        for time in times {
            let state = self.state_at(*time)?;
            sampled.push(*time, &state);
        }
        Ok(sampled)
    }

    /// Resample onto an evenly spaced grid from the first to the last
    /// recorded time, always including both ends.
    pub fn sample_every(&self, spacing: f64) -> Result<Trajectory, SimulationError> {
        let (start, end) = match (self.times.first(), self.times.last()) {
            (Some(start), Some(end)) => (*start, *end),
            _ => return Err(SimulationError::EmptySample),
        };
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(SimulationError::InvalidSolverConfiguration(format!(
                "sample spacing {} must be positive",
                spacing
            )));
        }
        let count = ((end - start) / spacing).floor() as usize;
        let mut grid: Vec<f64> = (0..=count)
            .map(|index| start + index as f64 * spacing)
            .collect();
        if grid.last().map_or(true, |last| end - last > 1.0e-9 * spacing) {
            grid.push(end);
        }
        self.sample_at(&grid)
    }

    /// Write the trajectory as CSV, with a `t` column followed by one
    /// column per species.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), SimulationError> {
        let mut writer = csv::Writer::from_writer(writer);
        let mut header = vec![String::from("t")];
        header.extend(self.species.iter().cloned());
        writer.write_record(&header)?;
        for (time, state) in self.times.iter().zip(self.states.iter()) {
            let mut record = vec![time.to_string()];
            record.extend(state.iter().map(f64::to_string));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, SimulationError> {
        let mut buffer: Vec<u8> = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trajectory(interpolation: Interpolation) -> Trajectory {
        let mut trajectory =
            Trajectory::new(vec!["S".to_string(), "I".to_string()], interpolation);
        trajectory.push(0.0, &[10.0, 0.0]);
        trajectory.push(1.0, &[8.0, 2.0]);
        trajectory.push(3.0, &[4.0, 1.0]);
        trajectory
    }

    #[test]
    fn linear_and_step_lookups() {
        assert_eq!(
            trajectory(Interpolation::Linear).state_at(2.0).unwrap(),
            vec![6.0, 1.5]
        );
        assert_eq!(
            trajectory(Interpolation::Step).state_at(2.0).unwrap(),
            vec![8.0, 2.0]
        );
        assert_eq!(
            trajectory(Interpolation::Linear).state_at(-1.0).unwrap(),
            vec![10.0, 0.0]
        );
        assert_eq!(
            trajectory(Interpolation::Linear).state_at(9.0).unwrap(),
            vec![4.0, 1.0]
        );
    }

    #[test]
    fn peak_and_series() {
        let trajectory = trajectory(Interpolation::Linear);
        assert_eq!(trajectory.peak("I").unwrap(), (1.0, 2.0));
        assert_eq!(trajectory.series("S").unwrap(), vec![10.0, 8.0, 4.0]);
        assert!(trajectory.series("R").is_err());
    }

    #[test]
    fn sample_every_includes_both_ends() {
        let sampled = trajectory(Interpolation::Linear)
            .sample_every(2.0)
            .unwrap();
        assert_eq!(sampled.times(), &[0.0, 2.0]);
        let sampled = trajectory(Interpolation::Linear)
            .sample_every(0.4)
            .unwrap();
        assert_eq!(sampled.final_time(), Some(3.0));
        assert!(trajectory(Interpolation::Linear).sample_every(0.0).is_err());
    }

    #[test]
    fn csv_has_a_header_and_one_row_per_point() {
        let csv = trajectory(Interpolation::Step).to_csv_string().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "t,S,I");
        assert_eq!(lines[1], "0,10,0");
        assert_eq!(lines.len(), 4);
    }
}
