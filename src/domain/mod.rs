pub mod calendar;
pub mod chart;
pub mod hours;
pub mod issue;
pub mod scope_change;
pub mod snapshot;
pub mod sprint;
pub mod time_point;
