use crate::config::MissingReferencePolicy;
use crate::model::{Course, CourseView, ResultRecord, ResultView, Student};
use crate::store::Store;
use anyhow::anyhow;
use std::collections::HashMap;

pub const UNKNOWN_NAME: &str = "unknown";

/// Course listing with the number of results recorded against each course.
/// One indexed count per course; rows follow the store's insertion order.
pub fn course_view(store: &Store) -> anyhow::Result<Vec<CourseView>> {
    store
        .list_courses()?
        .into_iter()
        .map(|course| -> anyhow::Result<CourseView> {
            let students_assigned = store.count_results_for_course(&course.id)?;
            Ok(CourseView {
                course_name: course.course_name,
                students_assigned,
            })
        })
        .collect()
}

/// Result listing with student and course names resolved.
pub fn result_view(
    store: &Store,
    policy: MissingReferencePolicy,
) -> anyhow::Result<Vec<ResultView>> {
    let results = store.list_results()?;
    let students = store.list_students()?;
    let courses = store.list_courses()?;
    join_results(&results, &students, &courses, policy)
}

/// Resolves each result against id-keyed maps built once up front.
pub fn join_results(
    results: &[ResultRecord],
    students: &[Student],
    courses: &[Course],
    policy: MissingReferencePolicy,
) -> anyhow::Result<Vec<ResultView>> {
    let students_by_id: HashMap<&str, &Student> =
        students.iter().map(|s| (s.id.as_str(), s)).collect();
    let courses_by_id: HashMap<&str, &Course> =
        courses.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut rows = Vec::with_capacity(results.len());
    for result in results {
        let student = students_by_id.get(result.student_ref.as_str());
        let course = courses_by_id.get(result.course_ref.as_str());

        if student.is_none() || course.is_none() {
            tracing::warn!(
                result_id = %result.id,
                student_ref = %result.student_ref,
                course_ref = %result.course_ref,
                student_found = student.is_some(),
                course_found = course.is_some(),
                "result references a missing entity"
            );
            match policy {
                MissingReferencePolicy::Placeholder => {}
                MissingReferencePolicy::Omit => continue,
                MissingReferencePolicy::Fail => {
                    return Err(anyhow!(
                        "result {} references a missing student or course",
                        result.id
                    ));
                }
            }
        }

        rows.push(ResultView {
            student_name: student
                .map(|s| s.display_name())
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            course_name: course
                .map(|c| c.course_name.clone())
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            score: result.score.clone(),
        });
    }
    Ok(rows)
}
