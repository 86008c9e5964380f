use std::path::PathBuf;
use std::sync::Arc;

use crate::dashboard::health::table_files;
use crate::dashboard::{DashboardKind, DashboardView, ViewParams, build_view};
use crate::data::loader::{LoaderCache, SourceFingerprint};
use crate::data::model::Workbook;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Where the session reads its tables from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// One multi-sheet file, shown as the chart gallery.
    Workbook(PathBuf),
    /// A folder of the health CSV files, shown as the health overview.
    Directory(PathBuf),
}

impl Source {
    pub fn kind(&self) -> DashboardKind {
        match self {
            Source::Workbook(_) => DashboardKind::Gallery,
            Source::Directory(_) => DashboardKind::Health,
        }
    }
}

/// Content identity of everything a source loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceVersion(Vec<SourceFingerprint>);

struct Loaded {
    version: SourceVersion,
    workbook: Arc<Workbook>,
    /// Non-fatal load problems (missing or unreadable tables).
    warnings: Vec<String>,
}

struct Memo {
    version: SourceVersion,
    params: ViewParams,
    view: DashboardView,
}

/// Per-user context: loader cache, current source and the last built view.
///
/// The view is a pure function of `(source version, params)`; it is rebuilt
/// only when either changes.
pub struct Session {
    cache: LoaderCache,
    source: Option<Source>,
    loaded: Option<Loaded>,
    memo: Option<Memo>,
    builds: usize,

    /// Current view parameters.
    pub params: ViewParams,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(top_n: usize) -> Self {
        Self {
            cache: LoaderCache::new(),
            source: None,
            loaded: None,
            memo: None,
            builds: 0,
            params: ViewParams {
                kind: DashboardKind::Gallery,
                top_n,
            },
            status_message: None,
        }
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    /// Tables of the current source, for the raw-data preview.
    pub fn workbook(&self) -> Option<&Workbook> {
        self.loaded.as_ref().map(|l| l.workbook.as_ref())
    }

    /// Switch to a new source and load it.
    pub fn open(&mut self, source: Source) {
        self.params.kind = source.kind();
        self.source = Some(source);
        self.reload();
    }

    /// Re-read the current source. Unchanged files are served from the cache
    /// and keep their version, so the memoized view survives.
    pub fn reload(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        self.status_message = None;

        match source {
            Source::Workbook(path) => match self.cache.load(&path) {
                Ok((fingerprint, workbook)) => {
                    self.loaded = Some(Loaded {
                        version: SourceVersion(vec![fingerprint]),
                        workbook,
                        warnings: Vec::new(),
                    });
                }
                Err(err) => {
                    log::error!("{}: {err}", path.display());
                    self.stop(format!("Could not load {}: {err}", path.display()));
                }
            },
            Source::Directory(dir) => {
                let (fingerprints, report) = self.cache.load_directory(&dir, &table_files());
                if report.is_fatal() {
                    log::error!("no table could be loaded from {}", dir.display());
                    let mut message = format!("No table could be loaded from {}.", dir.display());
                    for line in report.messages() {
                        message.push('\n');
                        message.push_str(&line);
                    }
                    self.stop(message);
                    return;
                }
                self.loaded = Some(Loaded {
                    version: SourceVersion(fingerprints),
                    warnings: report.messages(),
                    workbook: Arc::new(report.workbook),
                });
            }
        }
    }

    /// Nothing to render for this source.
    fn stop(&mut self, message: String) {
        self.loaded = None;
        self.memo = None;
        self.status_message = Some(message);
    }

    pub fn set_top_n(&mut self, top_n: usize) {
        self.params.top_n = top_n.max(1);
    }

    /// The dashboard for the current source and parameters.
    pub fn view(&mut self) -> Option<&DashboardView> {
        let loaded = self.loaded.as_ref()?;
        let fresh = matches!(
            &self.memo,
            Some(m) if m.version == loaded.version && m.params == self.params
        );
        if !fresh {
            self.builds += 1;
            log::debug!("building view #{} ({:?})", self.builds, self.params);
            let mut view = build_view(&loaded.workbook, &self.params);
            let mut warnings = loaded.warnings.clone();
            warnings.append(&mut view.warnings);
            view.warnings = warnings;
            self.memo = Some(Memo {
                version: loaded.version.clone(),
                params: self.params,
                view,
            });
        }
        self.memo.as_ref().map(|m| &m.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::health::{ALCOHOL, VISITS};

    fn health_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(format!("{VISITS}.csv")),
            "진료년월,주상병명,진료인원(명)\n2023-01,우울증,10\n2023-01,불면증,4\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(format!("{ALCOHOL}.csv")),
            "연도,구분,계\n2022,사망자수,300\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn view_is_memoized_per_version_and_params() {
        let dir = health_dir();
        let mut session = Session::new(5);
        session.open(Source::Directory(dir.path().to_path_buf()));
        assert_eq!(session.params.kind, DashboardKind::Health);

        assert!(session.view().is_some());
        assert!(session.view().is_some());
        assert_eq!(session.builds, 1);

        session.set_top_n(1);
        session.view();
        assert_eq!(session.builds, 2);

        session.reload();
        session.view();
        assert_eq!(session.builds, 2);

        std::fs::write(
            dir.path().join(format!("{ALCOHOL}.csv")),
            "연도,구분,계\n2022,사망자수,301\n",
        )
        .unwrap();
        session.reload();
        session.view();
        assert_eq!(session.builds, 3);
    }

    #[test]
    fn partial_directory_reports_missing_tables_once() {
        let dir = health_dir();
        let mut session = Session::new(5);
        session.open(Source::Directory(dir.path().to_path_buf()));
        let view = session.view().unwrap();
        let missing: Vec<&String> = view.warnings.iter().filter(|w| w.starts_with("Missing:")).collect();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].contains("예산"));
        assert!(!missing[0].contains(VISITS));
    }

    #[test]
    fn empty_directory_stops_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(5);
        session.open(Source::Directory(dir.path().to_path_buf()));
        assert!(session.view().is_none());
        assert!(session.status_message.as_deref().unwrap().starts_with("No table"));
    }

    #[test]
    fn unreadable_workbook_stops_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, b"definitely not a zip").unwrap();
        let mut session = Session::new(5);
        session.open(Source::Workbook(path));
        assert!(session.view().is_none());
        assert!(session.status_message.is_some());
        assert!(session.workbook().is_none());
    }
}
