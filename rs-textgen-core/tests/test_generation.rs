use rs_textgen_core::{
	generate, prepare, prepare_file, Checkpoint, GenerationConfig, ModelInput, NGramPredictor, Predictor, Result,
	StartSeed, TextGenError, Window,
};

fn temp_dir(name: &str) -> std::path::PathBuf {
	let dir = std::env::temp_dir().join(format!("rs-textgen-{name}-{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	dir
}

#[test]
fn abc_corpus_and_one_hot_model() {
	let (vocabulary, corpus) = prepare("abcabcabcabc", 3).unwrap();
	assert_eq!(vocabulary.len(), 3);
	assert_eq!(corpus.len(), 9);
	assert!(corpus.windows().all(|window| window.len() == 3));

	let (first_window, first_target) = corpus.pair(0).unwrap();
	assert_eq!(vocabulary.decode(first_window).unwrap(), "abc");
	assert_eq!(vocabulary.char_of(first_target), Some('a'));

	let a = vocabulary.code_of('a').unwrap() as usize;
	let always_a = move |_: &ModelInput| -> Result<Vec<f32>> {
		let mut scores = vec![0.0; 3];
		scores[a] = 1.0;
		Ok(scores)
	};

	for (window, _) in corpus.iter() {
		let text = generate(&always_a, Window::new(window).unwrap(), vocabulary.len(), &vocabulary, 5).unwrap();
		assert_eq!(text, "aaaaa");
	}
}

#[test]
fn mismatched_vocab_size_fails_on_first_prediction() {
	let (vocabulary, corpus) = prepare("abcabcabcabc", 3).unwrap();
	let model = NGramPredictor::fit(corpus.codes(), vocabulary.len() + 2, 2).unwrap();

	let seed = Window::new(corpus.window(0).unwrap()).unwrap();
	let result = generate(&model, seed, vocabulary.len(), &vocabulary, 10);
	assert!(matches!(result, Err(TextGenError::ConfigMismatch { expected: 3, actual: 5 })));
}

#[test]
fn model_with_smaller_vocabulary_is_a_config_mismatch() {
	// Fitted on two codes, used with a five-character corpus.
	let model = NGramPredictor::fit(&[0, 1, 0, 1, 0, 1], 2, 2).unwrap();
	let (vocabulary, _) = prepare("abcdeabcde", 3).unwrap();

	let seed = Window::new(&[2, 3, 4]).unwrap();
	let result = generate(&model, seed, vocabulary.len(), &vocabulary, 4);
	assert!(matches!(result, Err(TextGenError::ConfigMismatch { expected: 5, actual: 2 })));
}

#[test]
fn reference_model_continues_a_periodic_text() {
	let mut config = GenerationConfig::default();
	config.set_seq_len(4).unwrap();
	config.set_order(3).unwrap();
	config.length = 9;
	config.start_seed = StartSeed::Index(0);

	let (vocabulary, corpus) = prepare("abcabcabcabcabc", config.seq_len()).unwrap();
	let model = NGramPredictor::fit(corpus.codes(), vocabulary.len(), config.order()).unwrap();
	let seed = config.start_seed.select(&corpus, &vocabulary).unwrap();

	// Seed is "abca".
	let text = generate(&model, seed, vocabulary.len(), &vocabulary, config.length).unwrap();
	assert_eq!(text, "bcabcabca");
}

#[test]
fn checkpoint_round_trip_predicts_identically() {
	let dir = temp_dir("checkpoint");
	let path = dir.join("model.ckpt");
	let text = "to be or not to be, that is the question";
	let (vocabulary, corpus) = prepare(text, 8).unwrap();

	let fitted = NGramPredictor::load_or_fit(&path, corpus.codes(), vocabulary.len(), 4).unwrap();
	assert!(path.exists());
	let loaded = NGramPredictor::load(&path).unwrap();
	assert_eq!(loaded, fitted);
	assert_eq!(loaded.vocab_size(), vocabulary.len());
	assert_eq!(loaded.order(), 4);

	for (window, _) in corpus.iter() {
		let input = ModelInput::from_codes(window.iter().copied(), vocabulary.len());
		assert_eq!(loaded.predict(&input).unwrap(), fitted.predict(&input).unwrap());
	}

	// A second call loads instead of fitting.
	let reloaded = NGramPredictor::load_or_fit(&path, &[0], 1, 4).unwrap();
	assert_eq!(reloaded, fitted);

	std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn unreadable_checkpoints_are_load_failures() {
	let dir = temp_dir("corrupt");
	let garbage = dir.join("garbage.ckpt");
	std::fs::write(&garbage, [0xff, 0xff, 0xff]).unwrap();

	assert!(matches!(NGramPredictor::load(&garbage), Err(TextGenError::ModelLoad(_))));
	assert!(matches!(NGramPredictor::load(dir.join("missing.ckpt")), Err(TextGenError::ModelLoad(_))));

	std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn prepare_file_reads_the_whole_corpus() {
	let dir = temp_dir("corpus");
	let path = dir.join("corpus.txt");
	std::fs::write(&path, "line one\nline two\n").unwrap();

	let (vocabulary, corpus) = prepare_file(&path, 5).unwrap();
	assert_eq!(corpus.len(), 18 - 5);
	assert!(vocabulary.code_of('\n').is_some());
	assert!(matches!(prepare_file(dir.join("missing.txt"), 5), Err(TextGenError::Io(_))));

	std::fs::remove_dir_all(&dir).unwrap();
}
