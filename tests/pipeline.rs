use std::{cell::RefCell, error::Error, fs, io, path::Path, path::PathBuf, rc::Rc};

use transcribe_stamps::{
    ModelError, ModelSource, Normalizer, TranscribeError, Transcriber, TranscriptionEngine,
    TranscriptionResult, TranscriptionSegment,
};

#[derive(Default)]
struct Calls {
    loads: Vec<PathBuf>,
    sample_lengths: Vec<usize>,
}

struct MockEngine {
    responses: Vec<Result<TranscriptionResult, io::Error>>,
    calls: Rc<RefCell<Calls>>,
    loaded: bool,
}

impl MockEngine {
    fn with_responses(
        responses: Vec<Result<TranscriptionResult, io::Error>>,
    ) -> (Self, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        (
            Self {
                responses,
                calls: Rc::clone(&calls),
                loaded: false,
            },
            calls,
        )
    }
}

impl TranscriptionEngine for MockEngine {
    type Params = ();

    fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn Error>> {
        self.calls.borrow_mut().loads.push(model_path.to_path_buf());
        self.loaded = true;
        Ok(())
    }

    fn unload_model(&mut self) {
        self.loaded = false;
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn transcribe_samples(
        &mut self,
        samples: Vec<f32>,
        _params: Option<()>,
    ) -> Result<TranscriptionResult, Box<dyn Error>> {
        self.calls.borrow_mut().sample_lengths.push(samples.len());
        if self.responses.is_empty() {
            return Err("no mock response configured".into());
        }
        match self.responses.remove(0) {
            Ok(result) => Ok(result),
            Err(err) => Err(Box::new(err)),
        }
    }
}

fn make_result(language: Option<&str>, segments: &[(&str, f32, f32)]) -> TranscriptionResult {
    TranscriptionResult {
        language: language.map(str::to_string),
        text: segments.iter().map(|(text, _, _)| *text).collect(),
        segments: segments
            .iter()
            .map(|(text, start, end)| TranscriptionSegment {
                start: *start,
                end: *end,
                text: text.to_string(),
            })
            .collect(),
    }
}

#[cfg(unix)]
fn write_silence(path: &Path, samples: usize) -> Result<(), Box<dyn Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for _ in 0..samples {
        writer.write_sample(0i16)?;
    }
    writer.finalize()?;
    Ok(())
}

fn model_file(dir: &Path) -> Result<ModelSource, Box<dyn Error>> {
    let path = dir.join("ggml-test.bin");
    fs::write(&path, b"ggml")?;
    Ok(ModelSource::Path(path))
}

#[test]
fn missing_input_fails_before_loading_the_model() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let (engine, calls) = MockEngine::with_responses(vec![]);
    let mut transcriber = Transcriber::new(
        engine,
        model_file(dir.path())?,
        Normalizer::new("/nonexistent/ffmpeg"),
    );

    let err = transcriber.transcribe(Path::new("nofile.mp3")).unwrap_err();
    assert!(matches!(err, TranscribeError::FileNotFound(_)));
    assert!(calls.borrow().loads.is_empty());
    assert!(!transcriber.engine().is_loaded());
    Ok(())
}

#[test]
fn unknown_model_is_reported_after_validation() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("speech.wav");
    fs::write(&input, b"RIFF")?;

    let (engine, _) = MockEngine::with_responses(vec![]);
    let source = ModelSource::Named {
        name: "gigantic".to_string(),
        dir: None,
        download: false,
    };
    let mut transcriber = Transcriber::new(engine, source, Normalizer::default());

    let err = transcriber.transcribe(&input).unwrap_err();
    assert!(matches!(
        err,
        TranscribeError::Model(ModelError::UnknownModel(ref name)) if name == "gigantic"
    ));
    Ok(())
}

// Every test that executes the fake transcoder lives here so the script is
// never exec'd while another thread is writing one.
#[cfg(unix)]
#[test]
fn pipeline_shapes_engine_output() -> Result<(), Box<dyn Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir()?;
    let work = tempfile::tempdir()?;

    let fixture = dir.path().join("normalized-fixture.wav");
    write_silence(&fixture, 1_600)?;

    let script = dir.path().join("fake-ffmpeg");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\nfor arg in \"$@\"; do last=\"$arg\"; done\ncp '{}' \"$last\"\n",
            fixture.display()
        ),
    )?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

    let input = dir.path().join("Interview.MP3");
    fs::write(&input, b"ID3")?;

    let (engine, calls) = MockEngine::with_responses(vec![
        Ok(make_result(
            Some("en"),
            &[(" Hello there.", 0.0, 1.234), (" General Kenobi. ", 1.234, 2.5)],
        )),
        Err(io::Error::new(io::ErrorKind::Other, "decoder exploded")),
    ]);
    let mut transcriber = Transcriber::new(
        engine,
        model_file(dir.path())?,
        Normalizer::new(&script).with_temp_dir(work.path()),
    );

    let output = transcriber.transcribe(&input)?;
    assert_eq!(output.language.as_deref(), Some("en"));
    assert_eq!(output.full_text, "Hello there. General Kenobi.");
    assert_eq!(output.segments.len(), 2);
    assert_eq!(output.segments[0].end, 1.23);
    assert_eq!(output.segments[1].text, "General Kenobi.");
    assert!(fs::read_dir(work.path())?.next().is_none());

    let err = transcriber.transcribe(&input).unwrap_err();
    match err {
        TranscribeError::Inference(message) => assert!(message.contains("decoder exploded")),
        other => panic!("expected inference failure, got {other:?}"),
    }

    // an empty but valid recording yields an empty transcript, not an error
    write_silence(&fixture, 0)?;
    let output = transcriber.transcribe(&input)?;
    assert_eq!(output.language, None);
    assert_eq!(output.full_text, "");
    assert!(output.segments.is_empty());
    assert!(fs::read_dir(work.path())?.next().is_none());

    let calls = calls.borrow();
    assert_eq!(calls.loads.len(), 1, "model is loaded once");
    assert_eq!(
        calls.sample_lengths,
        [1_600, 1_600],
        "engine is not called for empty audio"
    );
    Ok(())
}

#[test]
#[ignore] // Requires ffmpeg, the base model and tests/fixtures/speech-5s.wav
fn real_model_transcribes_speech() -> Result<(), Box<dyn Error>> {
    use transcribe_stamps::engines::whisper::WhisperEngine;

    let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/speech-5s.wav");
    let mut transcriber = Transcriber::new(
        WhisperEngine::new(),
        ModelSource::default(),
        Normalizer::default(),
    );

    let output = transcriber.transcribe(&input)?;
    assert!(!output.segments.is_empty());
    assert!(output.segments.iter().any(|s| !s.text.is_empty()));
    for segment in &output.segments {
        assert!(segment.start <= segment.end);
    }
    Ok(())
}
