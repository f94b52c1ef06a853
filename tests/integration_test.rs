// Integration tests for tracklore
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tracklore::pipeline;
use tracklore::prelude::*;
use tracklore::{MatcherConfig, ProfileStore};
use tracklore_storage::{load_catalog, BlendInputWriter, RECOMMENDATIONS_FILE, RESUME_FILE};

fn write_catalog(path: &Path) {
    let mut records = Vec::new();
    for i in 0..6 {
        records.push(json!({
            "ID": format!("rap_{:03}", i),
            "title": format!("Street Flow {}", i),
            "artist": "MC Test",
            "album": "",
            "year": "2020",
            "lyrics": "street money gang street flow night flow street",
            "tags": ["rap", "street", "flow"],
            "moods": ["dark"],
            "instruments": ["808"],
            "subgenres": ["drill"],
            "contexts": []
        }));
    }
    for i in 0..6 {
        records.push(json!({
            "ID": format!("country_{:03}", i),
            "title": format!("Dusty Road {}", i),
            "artist": "Hank Example",
            "album": "Porch",
            "year": "1999",
            "lyrics": "banjo road truck whiskey road banjo porch",
            "tags": ["country", "banjo", "road"],
            "moods": ["warm"],
            "instruments": ["banjo"],
            "subgenres": ["classic_country"],
            "contexts": ["roadtrip"]
        }));
    }
    records.push(json!({
        "ID": "crossover_001",
        "title": "Road Flow",
        "artist": "Mixed",
        "lyrics": "banjo street road flow banjo",
        "tags": ["country", "rap", "street", "banjo"]
    }));
    fs::write(path, serde_json::to_string_pretty(&records).unwrap()).unwrap();
}

#[test]
fn test_prototypes_written_per_track() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    write_catalog(&catalog);
    let out = dir.path().join("prototypes");

    let run = pipeline::build_prototypes(&catalog, &out, &PrototypeConfig::default(), None).unwrap();
    assert_eq!(run.tracks, 13);
    assert_eq!(run.written, 13);

    let text = fs::read_to_string(out.join("rap_000.txt")).unwrap();
    let first = text.lines().next().unwrap();
    assert!(first.starts_with("street:"));
    assert!(first.ends_with("0.9"));

    let prototype = PrototypeStore::new(&out).read("rap_000").unwrap().unwrap();
    assert_eq!(prototype.get("street"), Some(0.9));
    assert!(prototype.iter().all(|e| (0.6..=0.9).contains(&e.score)));
}

#[test]
fn test_stopwords_file_filters_terms() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    write_catalog(&catalog);
    let stopwords = dir.path().join("stop.txt");
    fs::write(&stopwords, "street\nbanjo\n").unwrap();
    let out = dir.path().join("prototypes");

    pipeline::build_prototypes(&catalog, &out, &PrototypeConfig::default(), Some(stopwords.as_path())).unwrap();
    let prototype = PrototypeStore::new(&out).read("rap_000").unwrap().unwrap();
    assert!(!prototype.contains("street"));
    assert!(prototype.contains("flow"));
}

#[test]
fn test_profiles_are_idempotent() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    write_catalog(&catalog);
    let config = DistillerConfig::light();

    let first = dir.path().join("first");
    let second = dir.path().join("second");
    pipeline::distill_profiles(&catalog, &first, &config, GenreLexicon::default()).unwrap();
    let profiles =
        pipeline::distill_profiles(&catalog, &second, &config, GenreLexicon::default()).unwrap();
    assert_eq!(profiles.len(), 8);

    for category in ["rap", "country", "metal", "pop"] {
        for kind in ["typical", "rigid"] {
            let a = fs::read(first.join(kind).join(format!("{}.txt", category))).unwrap();
            let b = fs::read(second.join(kind).join(format!("{}.txt", category))).unwrap();
            assert_eq!(a, b, "{}/{} differs between runs", kind, category);
        }
    }

    let metal = ProfileStore::new(&second).read("metal").unwrap();
    assert!(metal.is_empty());
    let rap = ProfileStore::new(&second).read("rap").unwrap();
    assert!(rap.rigid.contains(&"street".to_string()));
    assert!(!ProfileStore::new(&second)
        .read("country")
        .unwrap()
        .rigid
        .contains(&"flow".to_string()));
}

#[test]
fn test_full_pipeline_recommends_crossover() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    write_catalog(&catalog);
    let prototypes = dir.path().join("prototypes");
    let profiles = dir.path().join("profiles");
    let blends = dir.path().join("blends");
    let exports = dir.path().join("exports");

    pipeline::build_prototypes(&catalog, &prototypes, &PrototypeConfig::default(), None).unwrap();
    pipeline::distill_profiles(&catalog, &profiles, &DistillerConfig::light(), GenreLexicon::default())
        .unwrap();

    let writer = BlendInputWriter::new(ProfileStore::new(&profiles), &blends);
    let blend = writer.write_pair("rap", "country").unwrap();

    // the blend engine keeps every typical property of the modifier
    let composite = CompositeProfile::parse(&fs::read_to_string(&blend).unwrap()).unwrap();
    let selection: Vec<bool> = composite
        .typical
        .iter()
        .map(|t| t.origin == Origin::Modifier)
        .collect();
    let bits: Vec<String> = selection
        .iter()
        .map(|b| if *b { "1".to_string() } else { "0".to_string() })
        .collect();
    let mut text = fs::read_to_string(&blend).unwrap();
    text.push_str(&format!("Scenario: [{}, 0.5]\n", bits.join(", ")));
    fs::write(&blend, text).unwrap();

    let config = MatcherConfig {
        min_match_rate: 0.5,
        ..MatcherConfig::default()
    };
    let run = pipeline::recommend(&blend, &catalog, &prototypes, &config, Some(exports.as_path())).unwrap();

    assert_eq!(run.summary.category, "rap_country.txt");
    assert_eq!(run.outcome.total, 13);
    let ids: Vec<_> = run.outcome.results.iter().map(|r| r.track_id.as_str()).collect();
    assert!(ids.contains(&"crossover_001"));
    assert!(run
        .outcome
        .results
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
    for result in &run.outcome.results {
        assert!(!result.anchor_hits.is_empty());
    }

    let recommendations = fs::read_to_string(exports.join(RECOMMENDATIONS_FILE)).unwrap();
    assert_eq!(recommendations.lines().count(), run.outcome.results.len());
    assert!(recommendations.contains("crossover_001 - Road Flow\trap_country.txt"));
    let resume = fs::read_to_string(exports.join(RESUME_FILE)).unwrap();
    assert_eq!(resume, format!("rap_country.txt\t{}\n", run.summary.classified));
}

#[test]
fn test_negated_anchor_excludes_tracks() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    write_catalog(&catalog);
    let prototypes = dir.path().join("prototypes");
    pipeline::build_prototypes(&catalog, &prototypes, &PrototypeConfig::default(), None).unwrap();

    let profile_path = dir.path().join("street_no_banjo.json");
    let profile = CompositeProfile::new("rap", "country")
        .with_rigid("street", Origin::Head)
        .with_rigid("-banjo", Origin::Modifier);
    fs::write(&profile_path, serde_json::to_string(&profile).unwrap()).unwrap();

    let run = pipeline::recommend(
        &profile_path,
        &catalog,
        &prototypes,
        &MatcherConfig::default(),
        None,
    )
    .unwrap();
    let ids: Vec<_> = run.outcome.results.iter().map(|r| r.track_id.as_str()).collect();
    assert_eq!(ids.len(), 6);
    assert!(ids.iter().all(|id| id.starts_with("rap_")));
}

#[test]
fn test_enriched_catalog_feeds_distiller() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    fs::write(
        &catalog,
        serde_json::to_string(&json!([
            {"ID": "p1", "lyrics": "oh baby baby oh baby baby oh", "tags": ["pop"]},
            {"ID": "p2", "lyrics": "baby baby baby baby", "tags": ["pop"]}
        ]))
        .unwrap(),
    )
    .unwrap();

    tracklore_storage::enrich_catalog(&catalog, None, 0.25).unwrap();
    let loaded = load_catalog(&catalog).unwrap();
    assert!(loaded.tracks.iter().all(|t| t.tags.contains(&"high_repetition".to_string())));

    let profiles = dir.path().join("profiles");
    let distilled =
        pipeline::distill_profiles(&catalog, &profiles, &DistillerConfig::default(), GenreLexicon::default())
            .unwrap();
    let pop = distilled.iter().find(|p| p.category == "pop").unwrap();
    assert!(pop.rigid.contains(&"high_repetition".to_string()));
    assert!(pop.typical_weight("high_repetition").unwrap() < pop.typical_weight("pop").unwrap());
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"matcher": {"min_anchors": 2}, "distiller": {"topk_typical": 3}}"#).unwrap();

    let config = pipeline::load_run_config(Some(path.as_path())).unwrap();
    assert_eq!(config.matcher.min_anchors, 2);
    assert_eq!(config.distiller.topk_typical, 3);
    assert_eq!(pipeline::load_run_config(None).unwrap(), RunConfig::default());

    fs::write(&path, r#"{"matcher": {"min_match_rate": 2.0}}"#).unwrap();
    assert!(pipeline::load_run_config(Some(path.as_path())).is_err());
}
