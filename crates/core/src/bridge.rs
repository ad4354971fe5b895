use crate::course::Course;

/// Finds the first course, in collection order, whose title contains `hint`
/// (case-insensitive). `None` is the defined no-match outcome.
pub fn resolve<'a>(courses: &'a [Course], hint: &str) -> Option<&'a Course> {
    let hint = hint.to_lowercase();
    courses
        .iter()
        .find(|course| course.title.to_lowercase().contains(&hint))
}
