pub mod garmin;
