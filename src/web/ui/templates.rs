use askama::Template;
use askama_web::WebTemplate;

use crate::schedule::ScheduleRow;

/// Form inputs echoed back into the page.
#[derive(Debug, Clone)]
pub struct FormValues {
    pub lat: String,
    pub lon: String,
    pub alt: String,
    pub min_elevation: String,
    pub min_apogee: String,
    pub start_time: String,
    pub duration: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub form: FormValues,
    pub satellites: Vec<String>,
    pub passes: Option<Vec<ScheduleRow>>,
    pub conflicts: usize,
}

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
}
