//! Desktop front end widgets: the control panel and both charts.

pub mod panels;
pub mod plot;
