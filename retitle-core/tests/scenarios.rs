use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use retitle_core::{
    AuditLog, MatchInput, NoiseWords, RenameExecutor, RenameFs, Thresholds,
    decide, evaluate, extract_year, normalize, similarity,
};
use retitle_model::{
    CanonicalRecord, ExternalIds, MatchAction, ReasonCode, ReleaseYear,
    RenameStatus,
};

fn scenario_noise() -> NoiseWords {
    NoiseWords::new(["1080p", "bluray", "x264"])
}

fn movie_name_record() -> CanonicalRecord {
    CanonicalRecord::new(
        "Movie Name",
        Some(ReleaseYear::new(2019)),
        ExternalIds::from_raw(Some("tt7654321"), Some("1234")),
    )
}

#[test]
fn scene_filename_normalizes_and_keeps_year() {
    let raw = "Movie.Name.2019.1080p.BluRay.x264-GROUP.mkv";
    assert_eq!(normalize(raw, &scenario_noise()).as_str(), "Movie Name");
    assert_eq!(extract_year(raw).map(ReleaseYear::get), Some(2019));
}

#[test]
fn scores_map_onto_auto_ask_and_skip() {
    let record = movie_name_record();
    let input = MatchInput::new(
        "Movie.Name.2019.1080p.BluRay.x264-GROUP.mkv",
        "Movie Name",
        Some(ReleaseYear::new(2019)),
        &record,
    );
    let thresholds = Thresholds {
        auto: 100,
        ask: 85,
        year_tolerance: 1,
    };

    let auto = evaluate(&input, 100.0, &thresholds);
    assert_eq!(auto.action, MatchAction::AutoRename);
    assert_eq!(
        auto.proposed_name.as_deref(),
        Some("Movie Name (2019) {imdb-tt7654321}")
    );

    let ask = evaluate(&input, 90.0, &thresholds);
    assert_eq!(ask.action, MatchAction::AskConfirm);

    let skip = evaluate(&input, 80.0, &thresholds);
    assert_eq!(skip.action, MatchAction::Skip);
    assert_eq!(skip.reason, ReasonCode::InsufficientSimilarity);
    assert_eq!(skip.reason.to_string(), "insufficient similarity");
}

#[test]
fn tagged_filename_is_never_renamed() {
    let record = movie_name_record();
    let raw = "Movie Name (2019) {tmdb-1234}.mkv";
    let normalized = normalize(raw, &NoiseWords::default());
    let input = MatchInput::new(raw, normalized.as_str(), extract_year(raw), &record);

    for score in [0.0, 50.0, 100.0] {
        let decision = evaluate(&input, score, &Thresholds::default());
        assert_eq!(decision.action, MatchAction::Skip);
        assert_eq!(decision.reason, ReasonCode::AlreadyTagged);
        assert_eq!(decision.reason.to_string(), "already tagged");
    }
    assert_eq!(
        decide(&input, &Thresholds::default()).reason,
        ReasonCode::AlreadyTagged
    );
}

/// In-memory filesystem that folds case like NTFS or default APFS: a
/// direct rename between two spellings of one name is a silent no-op.
#[derive(Debug, Default)]
struct CaseInsensitiveFs {
    files: RefCell<BTreeMap<String, PathBuf>>,
    renames: RefCell<Vec<(PathBuf, PathBuf)>>,
    fail_renames_to: Option<PathBuf>,
}

impl CaseInsensitiveFs {
    fn with_file(path: &Path) -> Self {
        let fs = Self::default();
        fs.files.borrow_mut().insert(fold(path), path.to_path_buf());
        fs
    }

    fn stored(&self, path: &Path) -> Option<PathBuf> {
        self.files.borrow().get(&fold(path)).cloned()
    }
}

fn fold(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

impl RenameFs for CaseInsensitiveFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(&fold(path))
    }

    fn same_file(&self, a: &Path, b: &Path) -> io::Result<bool> {
        Ok(self.exists(a) && fold(a) == fold(b))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.renames
            .borrow_mut()
            .push((from.to_path_buf(), to.to_path_buf()));

        if self.fail_renames_to.as_deref() == Some(to) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }

        let mut files = self.files.borrow_mut();
        if fold(from) == fold(to) {
            return if files.contains_key(&fold(from)) {
                Ok(())
            } else {
                Err(io::ErrorKind::NotFound.into())
            };
        }
        if files.remove(&fold(from)).is_none() {
            return Err(io::ErrorKind::NotFound.into());
        }
        files.insert(fold(to), to.to_path_buf());
        Ok(())
    }
}

#[test]
fn case_only_rename_goes_through_temp_name() {
    let old = Path::new("/media/the matrix (1999) {imdb-tt0133093}.mkv");
    let fs = CaseInsensitiveFs::with_file(old);
    let executor = RenameExecutor::with_fs(fs, None);

    let outcome =
        executor.execute_rename(old, "The Matrix (1999) {imdb-tt0133093}", false);

    assert_eq!(outcome.status, RenameStatus::Renamed);
    let target = Path::new("/media/The Matrix (1999) {imdb-tt0133093}.mkv");
    assert_eq!(outcome.new_path, target);
    assert_eq!(executor.fs().stored(target).as_deref(), Some(target));

    let renames = executor.fs().renames.borrow();
    assert_eq!(renames.len(), 2);
    assert_eq!(renames[0].0, old);
    assert!(
        renames[0]
            .1
            .to_string_lossy()
            .contains(".retitle-tmp-"),
        "{:?}",
        renames[0].1
    );
    assert_eq!(renames[1].0, renames[0].1);
    assert_eq!(renames[1].1, target);
}

#[test]
fn failed_case_only_rename_restores_original() {
    let old = Path::new("/media/heat (1995) {tmdb-949}.mkv");
    let target = Path::new("/media/Heat (1995) {tmdb-949}.mkv");
    let mut fs = CaseInsensitiveFs::with_file(old);
    fs.fail_renames_to = Some(target.to_path_buf());

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("rename.log");
    let executor = RenameExecutor::with_fs(fs, Some(AuditLog::new(&log)));
    let outcome = executor.execute_rename(old, "Heat (1995) {tmdb-949}", false);

    assert_eq!(outcome.status, RenameStatus::Failed);
    let detail = outcome.detail.unwrap();
    assert!(detail.contains("original name restored"), "{detail}");
    assert_eq!(executor.fs().stored(old).as_deref(), Some(old));
    assert_eq!(executor.fs().files.borrow().len(), 1);

    let audit = std::fs::read_to_string(&log).unwrap();
    assert!(audit.contains("FAILED: "));
}

#[test]
fn case_only_rename_on_real_filesystem_reports_renamed() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("heat (1995) {tmdb-949}.mkv");
    std::fs::write(&old, b"x").unwrap();

    let executor = RenameExecutor::new(None);
    let outcome = executor.execute_rename(&old, "Heat (1995) {tmdb-949}", false);

    assert_eq!(outcome.status, RenameStatus::Renamed);
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Heat (1995) {tmdb-949}.mkv".to_string()]);
}

#[test]
fn normalization_is_idempotent_and_deterministic() {
    let noise = NoiseWords::default();
    let samples = [
        "Movie.Name.2019.1080p.BluRay.x264-GROUP.mkv",
        "The.Lord.of.the.Rings.The.Two.Towers.2002.EXTENDED.2160p.mkv",
        "[Group] Spirited Away (2001) [BD 1080p] [ABCDEF12].mkv",
        "Amélie.2001.DVDRip.XviD.avi",
        "2001.A.Space.Odyssey.1968.mkv",
        "Se7en (1995) (Criterion) web-dl.mp4",
        "Alien.Final.Cut.1979.mkv",
        "Blade.Runner.1982.Final.Cut.1080p.WEB-DL-GRP.mkv",
        "1984.1984.mkv",
    ];

    for raw in samples {
        let first = normalize(raw, &noise);
        assert_eq!(first, normalize(raw, &noise), "{raw}");
        assert_eq!(normalize(first.as_str(), &noise), first, "{raw}");
        assert!(!first.as_str().is_empty(), "{raw}");
    }
}

#[test]
fn similarity_is_symmetric() {
    let titles = [
        "Movie Name",
        "movie nam",
        "The Two Towers",
        "Spirited Away",
        "",
        "Amélie",
    ];
    for a in titles {
        for b in titles {
            assert_eq!(similarity(a, b), similarity(b, a), "{a:?} / {b:?}");
        }
    }
}

#[test]
fn year_extraction_ignores_cleanup() {
    let noisy = "[2004 Remaster] Movie.Name.2019.1080p.BluRay.x264-GROUP.mkv";
    let without_brackets = "Movie.Name.2019.1080p.BluRay.x264-GROUP.mkv";

    assert_eq!(extract_year(noisy).map(ReleaseYear::get), Some(2004));
    assert_eq!(extract_year(without_brackets).map(ReleaseYear::get), Some(2019));

    // Normalizing never feeds back into the extractor.
    let raw = "Movie.2019.mkv";
    let _ = normalize(raw, &NoiseWords::default());
    assert_eq!(extract_year(raw).map(ReleaseYear::get), Some(2019));
}

#[test]
fn pre_1900_canonical_year_is_kept_in_proposed_name() {
    let record = CanonicalRecord::new(
        "Arrival of a Train",
        Some(ReleaseYear::new(1895)),
        ExternalIds::from_raw(None, Some("160")),
    );
    let raw = "Arrival.of.a.Train.1895.mkv";
    let normalized = normalize(raw, &NoiseWords::default());
    assert_eq!(normalized.as_str(), "Arrival of a Train 1895");
    assert_eq!(extract_year(raw), None);

    let input = MatchInput::new(raw, "Arrival of a Train", extract_year(raw), &record);
    let decision = evaluate(&input, 100.0, &Thresholds::default());
    assert_eq!(decision.action, MatchAction::AskConfirm);
    assert_eq!(decision.reason, ReasonCode::YearMismatch);
    assert_eq!(
        decision.proposed_name.as_deref(),
        Some("Arrival of a Train (1895) {tmdb-160}")
    );
}
