use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Resolves package paths the way the packaging step wrote them: relative to the
/// directory holding the package-results file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePaths {
    base_dir: Utf8PathBuf,
}

impl PackagePaths {
    /// `input_file` may itself be relative; it is anchored at `working_dir` first.
    pub fn for_input(input_file: &Utf8Path, working_dir: &Utf8Path) -> Self {
        let input_file = absolutize(input_file, working_dir);
        let base_dir = match input_file.parent() {
            Some(parent) => parent.to_path_buf(),
            None => working_dir.to_path_buf(),
        };
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    pub fn resolve(&self, package_path: &str) -> Utf8PathBuf {
        if is_absolute_package_path(package_path) {
            return Utf8PathBuf::from(package_path);
        }
        normalize_lexically(&self.base_dir.join(package_path))
    }
}

/// Anchors `path` at `working_dir` unless it is already absolute.
pub fn absolutize(path: &Utf8Path, working_dir: &Utf8Path) -> Utf8PathBuf {
    if is_absolute_package_path(path.as_str()) {
        path.to_path_buf()
    } else {
        normalize_lexically(&working_dir.join(path))
    }
}

/// Host-absolute paths, plus Windows drive and UNC paths on any host.
///
/// Package results are produced on the IIS machine, so `D:\packages\a.zip` is absolute
/// even when this tool runs elsewhere.
pub fn is_absolute_package_path(path: &str) -> bool {
    if Utf8Path::new(path).is_absolute() {
        return true;
    }
    let bytes = path.as_bytes();
    let drive = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/');
    drive || path.starts_with("\\\\")
}

/// Removes `.` components and folds `..` into its parent without touching the disk.
pub fn normalize_lexically(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match out.components().next_back() {
                Some(Utf8Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`.
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_str()),
        }
    }
    if out.as_str().is_empty() {
        out.push(".");
    }
    out
}
