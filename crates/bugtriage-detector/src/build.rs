//! Bug-row construction from an accepted submission. Single place that
//! maps `Submission` fields onto a `Bug`, shared by the create/flag/approve
//! paths so they can't drift from each other field-by-field.

use chrono::Utc;
use uuid::Uuid;

use bugtriage_core::models::bug::{Classification, Status};
use bugtriage_core::models::{Bug, Submission};

#[allow(clippy::too_many_arguments)]
pub(crate) fn new_bug(
    submission: &Submission,
    quality_score: f64,
    embedding: Option<Vec<f32>>,
    duplicate_of: Option<Uuid>,
    similarity_score: Option<f64>,
    classification: Classification,
    status: Status,
) -> Bug {
    let now = Utc::now();
    Bug {
        id: Uuid::new_v4(),
        title: submission.title.clone(),
        description: submission.description.clone(),
        product: submission.product.clone(),
        component: submission.component.clone(),
        version: submission.version.clone(),
        severity: submission.severity,
        environment: submission.environment,
        device: submission.device.clone(),
        os_version: submission.os_version.clone(),
        build_version: submission.build_version.clone(),
        region: submission.region.clone(),
        reporter: submission.reporter.clone(),
        repro_steps: submission.repro_steps.clone(),
        expected_result: submission.expected_result.clone(),
        actual_result: submission.actual_result.clone(),
        logs: submission.logs.clone(),
        quality_score,
        embedding,
        is_duplicate: duplicate_of.is_some(),
        duplicate_of,
        similarity_score,
        is_recurring: false,
        classification,
        status,
        created_at: now,
        updated_at: now,
        context: submission.context.clone(),
    }
}
