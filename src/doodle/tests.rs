use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use tempfile::TempDir;

use super::{
    ClassificationResult, Classifier, ClassifyError, DenseModel, GRID_HEIGHT, GRID_PIXELS,
    GRID_WIDTH, InputTensor, LABEL_COUNT, LABELS, MODEL_LOADED_MESSAGE, ModelError,
    RecognitionOutcome, RecognitionRaster, RecognitionService, RecognitionStatus, RecognizeError,
    Recognizer, arg_max, classify, present, to_tensor,
};

/// Returns the same probabilities for every input.
struct FixedClassifier {
    probabilities: Vec<f32>,
    calls: Arc<AtomicUsize>,
}

impl FixedClassifier {
    fn new(probabilities: Vec<f32>) -> Self {
        Self {
            probabilities,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Classifier for FixedClassifier {
    fn classify(&self, _input: &InputTensor) -> Result<Vec<f32>, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.probabilities.clone())
    }
}

/// One-hot at the index given by the number of inked pixels, after `delay`.
struct InkCountClassifier {
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl Classifier for InkCountClassifier {
    fn classify(&self, input: &InputTensor) -> Result<Vec<f32>, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        let ink: f32 = input.values().sum();
        let mut out = vec![0.0; LABEL_COUNT];
        out[(ink.round() as usize) % LABEL_COUNT] = 1.0;
        Ok(out)
    }
}

/// Records how many `classify` calls overlap.
struct OverlapClassifier {
    delay: Duration,
    running: AtomicUsize,
    peak: Arc<AtomicUsize>,
}

impl Classifier for OverlapClassifier {
    fn classify(&self, _input: &InputTensor) -> Result<Vec<f32>, ClassifyError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(hand_probabilities())
    }
}

fn hand_probabilities() -> Vec<f32> {
    let mut probabilities = vec![0.05; LABEL_COUNT];
    probabilities[7] = 0.6;
    probabilities
}

fn tensor_with_ink(pixels: usize) -> InputTensor {
    let mut alphas = vec![0u8; GRID_PIXELS];
    for alpha in alphas.iter_mut().take(pixels) {
        *alpha = 255;
    }
    InputTensor::from_alphas(&alphas)
}

fn scribble(raster: &mut RecognitionRaster) {
    raster.paint(&[(4.0, 4.0), (14.0, 20.0), (24.0, 6.0)]);
}

// =============================================================================
// Grid and tensor
// =============================================================================

#[test]
fn blank_grid_maps_to_zero_tensor() {
    let raster = RecognitionRaster::new(2.0).unwrap();
    let tensor = to_tensor(&raster).unwrap();

    assert_eq!(tensor.shape(), &[1, GRID_HEIGHT, GRID_WIDTH, 1]);
    assert_eq!(tensor, InputTensor::zeros());
    assert!(raster.is_blank().unwrap());
}

#[test]
fn tensor_matches_alpha_channel_exactly() {
    let mut raster = RecognitionRaster::new(2.0).unwrap();
    scribble(&mut raster);

    let snapshot = raster.snapshot().unwrap();
    let tensor = to_tensor(&raster).unwrap();
    for h in 0..GRID_HEIGHT {
        for w in 0..GRID_WIDTH {
            let alpha = snapshot.alpha(w as i32, h as i32).unwrap();
            assert_eq!(tensor.get(h, w).unwrap(), f32::from(alpha) / 255.0);
        }
    }
}

#[test]
fn tensor_is_deterministic_and_bounded() {
    let mut first = RecognitionRaster::new(2.0).unwrap();
    let mut second = RecognitionRaster::new(2.0).unwrap();
    scribble(&mut first);
    scribble(&mut second);

    let a = to_tensor(&first).unwrap();
    let b = to_tensor(&second).unwrap();
    assert_eq!(a, b);
    assert!(a.values().all(|v| (0.0..=1.0).contains(&v)));
    assert!(a.values().any(|v| v > 0.0));
}

#[test]
fn clear_always_yields_blank_grid() {
    let mut raster = RecognitionRaster::new(3.0).unwrap();
    raster.clear();
    assert!(raster.is_blank().unwrap());

    scribble(&mut raster);
    assert!(!raster.is_blank().unwrap());
    raster.clear();
    assert!(raster.is_blank().unwrap());
    assert_eq!(to_tensor(&raster).unwrap(), InputTensor::zeros());
}

#[test]
fn paint_scaled_maps_view_onto_grid() {
    let mut raster = RecognitionRaster::new(2.0).unwrap();
    raster.paint_scaled(&[(140.0, 140.0), (150.0, 140.0)], 280.0, 280.0);

    let snapshot = raster.snapshot().unwrap();
    assert!(snapshot.alpha(14, 14).unwrap() > 0);
    assert_eq!(snapshot.alpha(2, 2).unwrap(), 0);
}

#[test]
fn empty_gesture_paints_nothing() {
    let mut raster = RecognitionRaster::new(2.0).unwrap();
    raster.paint(&[]);
    assert!(raster.is_blank().unwrap());
}

// =============================================================================
// Classification and presentation
// =============================================================================

#[test]
fn present_cites_arg_max_label_first() {
    let classifier = FixedClassifier::new(hand_probabilities());
    let result = classify(&classifier, &InputTensor::zeros()).unwrap();

    assert_eq!(result.top_index(), 7);
    assert_eq!(result.top_label(), "hand");

    let text = present(&result);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Predict: hand (60.00%)");
    assert!(lines[1].starts_with("Inference Time: "));
    assert!(lines[1].ends_with("(ms)"));
    assert_eq!(lines[2], "Details:");
    assert_eq!(lines.len(), 3 + LABEL_COUNT);
    assert_eq!(lines[3], "-       apple:  5.0000%");
    assert_eq!(lines[10], "-        hand: 60.0000%");
    assert_eq!(lines[11], "-   ice cream:  5.0000%");
}

#[test]
fn inference_time_uses_fixed_width_milliseconds() {
    let result =
        ClassificationResult::new(hand_probabilities(), Duration::from_millis(3)).unwrap();
    let text = present(&result);
    assert_eq!(text.lines().nth(1), Some("Inference Time:   3.000000(ms)"));
}

#[test]
fn wrong_output_length_is_rejected() {
    let classifier = FixedClassifier::new(vec![0.1; LABEL_COUNT - 1]);
    let err = classify(&classifier, &InputTensor::zeros()).unwrap_err();
    assert_eq!(
        err,
        ClassifyError::OutputLength {
            expected: LABEL_COUNT,
            actual: LABEL_COUNT - 1,
        }
    );
}

#[test]
fn arg_max_prefers_first_maximum_and_skips_nan() {
    assert_eq!(arg_max(&[0.2, 0.5, 0.5]), Some(1));
    assert_eq!(arg_max(&[f32::NAN, 0.1, 0.0]), Some(1));
    assert_eq!(arg_max(&[0.3, f32::NAN, 0.2]), Some(0));
    assert_eq!(arg_max(&[f32::NAN, f32::NAN]), None);
    assert_eq!(arg_max(&[]), None);
}

#[test]
fn result_length_always_matches_vocabulary() {
    let result =
        ClassificationResult::new(hand_probabilities(), Duration::from_millis(3)).unwrap();
    assert_eq!(result.probabilities().len(), LABELS.len());
    assert_eq!(result.entries().count(), LABEL_COUNT);
    assert_eq!(result.elapsed(), Duration::from_millis(3));
}

// =============================================================================
// Recognizer
// =============================================================================

#[test]
fn missing_model_disables_recognition() {
    let temp = TempDir::new().unwrap();
    let recognizer = Recognizer::load(&temp.path().join("missing.ddlm"));

    assert!(!recognizer.is_enabled());
    assert!(
        recognizer
            .status_message()
            .starts_with("Failed to load the model: ")
    );

    let mut raster = RecognitionRaster::new(2.0).unwrap();
    scribble(&mut raster);
    assert!(matches!(
        recognizer.recognize(&raster),
        Err(RecognizeError::Disabled)
    ));
}

#[test]
fn blank_grid_recognize_is_noop() {
    let classifier = Arc::new(FixedClassifier::new(hand_probabilities()));
    let calls = classifier.calls.clone();
    let recognizer = Recognizer::with_classifier(classifier);
    let raster = RecognitionRaster::new(2.0).unwrap();

    assert_eq!(recognizer.status_message(), MODEL_LOADED_MESSAGE);
    assert!(recognizer.recognize(&raster).unwrap().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn recognize_runs_classifier_on_drawn_grid() {
    let classifier = Arc::new(FixedClassifier::new(hand_probabilities()));
    let calls = classifier.calls.clone();
    let recognizer = Recognizer::with_classifier(classifier);
    let mut raster = RecognitionRaster::new(2.0).unwrap();
    scribble(&mut raster);

    let result = recognizer.recognize(&raster).unwrap().unwrap();
    assert_eq!(result.top_label(), "hand");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn prepare_skips_blank_grid_and_builds_tensor_otherwise() {
    let recognizer =
        Recognizer::with_classifier(Arc::new(FixedClassifier::new(hand_probabilities())));
    let mut raster = RecognitionRaster::new(2.0).unwrap();
    assert!(recognizer.prepare(&raster).unwrap().is_none());

    scribble(&mut raster);
    let tensor = recognizer.prepare(&raster).unwrap().unwrap();
    assert_eq!(tensor, to_tensor(&raster).unwrap());
}

#[test]
fn prepare_on_disabled_recognizer_fails() {
    let recognizer = Recognizer::disabled("no model path configured");
    let raster = RecognitionRaster::new(2.0).unwrap();
    assert!(matches!(
        recognizer.prepare(&raster),
        Err(RecognizeError::Disabled)
    ));
}

// =============================================================================
// Model artifact
// =============================================================================

fn hand_model() -> DenseModel {
    let mut bias = vec![0.0; LABEL_COUNT];
    bias[7] = 12f32.ln();
    DenseModel::from_parts(vec![0.0; LABEL_COUNT * GRID_PIXELS], bias).unwrap()
}

fn write_artifact(dir: &Path, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join("model.ddlm");
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn model_artifact_loads_and_classifies() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("model.ddlm");
    hand_model().write_to(&path).unwrap();

    let recognizer = Recognizer::load(&path);
    assert!(recognizer.is_enabled());
    assert_eq!(recognizer.status_message(), MODEL_LOADED_MESSAGE);

    let mut raster = RecognitionRaster::new(2.0).unwrap();
    scribble(&mut raster);
    let result = recognizer.recognize(&raster).unwrap().unwrap();

    assert_eq!(result.top_label(), "hand");
    let total: f32 = result.probabilities().iter().sum();
    assert!((total - 1.0).abs() < 1e-4);
    // exp(ln 12) / (9 + 12)
    assert!((result.top_probability() - 12.0 / 21.0).abs() < 1e-4);
}

#[test]
fn model_with_bad_magic_is_rejected() {
    let mut bytes = hand_model().to_bytes();
    bytes[0..4].copy_from_slice(b"TFL3");
    assert!(matches!(
        DenseModel::parse(&bytes),
        Err(ModelError::BadMagic)
    ));
}

#[test]
fn model_with_unknown_version_is_rejected() {
    let mut bytes = hand_model().to_bytes();
    bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
    assert!(matches!(
        DenseModel::parse(&bytes),
        Err(ModelError::UnsupportedVersion(2))
    ));
}

#[test]
fn model_with_wrong_shape_is_rejected() {
    let mut bytes = hand_model().to_bytes();
    bytes[12..16].copy_from_slice(&5u32.to_le_bytes());
    assert!(matches!(
        DenseModel::parse(&bytes),
        Err(ModelError::ShapeMismatch { classes: 5, .. })
    ));

    assert!(DenseModel::from_parts(vec![0.0; 3], vec![0.0; LABEL_COUNT]).is_err());
}

#[test]
fn truncated_model_is_rejected() {
    let temp = TempDir::new().unwrap();
    let bytes = hand_model().to_bytes();
    let path = write_artifact(temp.path(), &bytes[..bytes.len() - 4]);

    let recognizer = Recognizer::load(&path);
    assert!(!recognizer.is_enabled());
    assert!(recognizer.status_message().contains("truncated"));

    assert!(matches!(
        DenseModel::parse(&bytes[..8]),
        Err(ModelError::Truncated { .. })
    ));
}

// =============================================================================
// Recognition service
// =============================================================================

#[tokio::test]
async fn service_collapses_queued_requests_to_newest() {
    let calls = Arc::new(AtomicUsize::new(0));
    let classifier = Arc::new(InkCountClassifier {
        delay: Duration::ZERO,
        calls: calls.clone(),
    });
    let service = RecognitionService::new(
        &tokio::runtime::Handle::current(),
        classifier,
        Duration::from_secs(2),
    );

    assert_eq!(service.status().await, RecognitionStatus::Idle);
    assert_eq!(service.submit(tensor_with_ink(1)).unwrap(), 1);
    assert_eq!(service.submit(tensor_with_ink(2)).unwrap(), 2);
    assert_eq!(service.submit(tensor_with_ink(3)).unwrap(), 3);

    let outcome = service
        .wait_for_result(Duration::from_secs(2))
        .await
        .unwrap();
    match outcome {
        RecognitionOutcome::Success(result) => assert_eq!(result.top_index(), 3),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.status().await, RecognitionStatus::Completed(3));
}

#[tokio::test]
async fn service_discards_superseded_result() {
    let calls = Arc::new(AtomicUsize::new(0));
    let classifier = Arc::new(InkCountClassifier {
        delay: Duration::from_millis(150),
        calls: calls.clone(),
    });
    let service = RecognitionService::new(
        &tokio::runtime::Handle::current(),
        classifier,
        Duration::from_secs(2),
    );

    service.submit(tensor_with_ink(1)).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(service.status().await, RecognitionStatus::Running(1));
    service.submit(tensor_with_ink(2)).unwrap();

    let outcome = service
        .wait_for_result(Duration::from_secs(2))
        .await
        .unwrap();
    match outcome {
        RecognitionOutcome::Success(result) => assert_eq!(result.top_index(), 2),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(service.try_take_result().is_none());
}

#[tokio::test]
async fn service_reports_timeout() {
    let classifier = Arc::new(InkCountClassifier {
        delay: Duration::from_millis(300),
        calls: Arc::new(AtomicUsize::new(0)),
    });
    let service = RecognitionService::new(
        &tokio::runtime::Handle::current(),
        classifier,
        Duration::from_millis(20),
    );

    service.submit(tensor_with_ink(4)).unwrap();
    let outcome = service
        .wait_for_result(Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(outcome, RecognitionOutcome::TimedOut);
    assert_eq!(service.status().await, RecognitionStatus::TimedOut(1));
}

#[tokio::test]
async fn timed_out_inference_blocks_the_next_request() {
    let peak = Arc::new(AtomicUsize::new(0));
    let classifier = Arc::new(OverlapClassifier {
        delay: Duration::from_millis(300),
        running: AtomicUsize::new(0),
        peak: peak.clone(),
    });
    let service = RecognitionService::new(
        &tokio::runtime::Handle::current(),
        classifier,
        Duration::from_millis(50),
    );

    service.submit(tensor_with_ink(1)).unwrap();
    let first = service
        .wait_for_result(Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(first, RecognitionOutcome::TimedOut);

    service.submit(tensor_with_ink(2)).unwrap();
    let second = service
        .wait_for_result(Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(second, RecognitionOutcome::TimedOut);
    assert_eq!(service.status().await, RecognitionStatus::TimedOut(2));

    assert_eq!(peak.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn service_surfaces_classifier_errors() {
    let classifier = Arc::new(FixedClassifier::new(vec![0.5; 2]));
    let service = RecognitionService::new(
        &tokio::runtime::Handle::current(),
        classifier,
        Duration::from_secs(2),
    );

    service.submit(InputTensor::zeros()).unwrap();
    let outcome = service
        .wait_for_result(Duration::from_secs(2))
        .await
        .unwrap();
    assert!(matches!(outcome, RecognitionOutcome::Failed(message) if message.contains("expected 10")));
}

#[test]
fn submit_fails_when_worker_is_gone() {
    let service = RecognitionService::with_closed_channel_for_test();
    assert!(matches!(
        service.submit(InputTensor::zeros()),
        Err(RecognizeError::ServiceStopped)
    ));
}
