//! Readable labels for cryptic command lines.
//!
//! Electron apps, bundlers and framework dev servers tend to show up with very
//! long invocations. [`humanize`] maps the recognizable ones to a short label
//! and returns everything else untouched. Labels are for display only; they
//! never feed into classification or termination.

/// Marker shared by Electron child processes (`/proc/self/exe --type=...`).
const SELF_EXE: &str = "/proc/self/exe";

/// Node dev-server tools, checked in order against the lower-cased command.
const NODE_DEV_SERVERS: &[(&str, &str)] = &[
    ("vite", "Vite Dev Server"),
    ("webpack", "Webpack Dev Server"),
    ("next", "Next.js Dev Server"),
    ("react-scripts", "React Dev Server"),
    ("vue-cli-service", "Vue Dev Server"),
];

/// Python web servers, checked in order against the raw command.
const PYTHON_SERVERS: &[(&str, &str)] = &[
    ("manage.py runserver", "Django Dev Server"),
    ("flask run", "Flask Dev Server"),
    ("app.py", "Flask Dev Server"),
    ("uvicorn", "Uvicorn (FastAPI/Starlette)"),
    ("gunicorn", "Gunicorn WSGI Server"),
];

/// Convert a command line into a human-readable label.
///
/// Checks run in priority order and the first match wins: editor
/// subprocesses, generic Electron subprocesses, Node dev servers, Python web
/// servers, Java applications, Docker port proxies. With no match the command
/// line is returned unchanged.
///
/// # Examples
/// ```
/// use portsweep_core::humanize;
///
/// assert_eq!(
///     humanize("python3 manage.py runserver 0.0.0.0:8000", "python3"),
///     "Django Dev Server"
/// );
/// assert_eq!(
///     humanize("myservice --config=/etc/x.conf", "myservice"),
///     "myservice --config=/etc/x.conf"
/// );
/// ```
pub fn humanize(command_line: &str, process_name: &str) -> String {
    let name = process_name.to_lowercase();
    let command_lower = command_line.to_lowercase();

    if name.contains("code") || command_line.contains("/snap/code/") {
        if let Some(label) = editor_label(command_line, &command_lower) {
            return label.to_string();
        }
    }

    if let Some(kind) = electron_kind(command_line) {
        return format!("{} - {} Process", process_name, kind);
    }

    if name.contains("node") {
        if let Some(label) = node_label(command_line, &command_lower) {
            return label;
        }
    }

    if name.contains("python") {
        if let Some((_, label)) = PYTHON_SERVERS
            .iter()
            .find(|(needle, _)| command_line.contains(needle))
        {
            return label.to_string();
        }
    }

    if name.contains("java") {
        if command_lower.contains("spring") {
            return "Spring Boot Application".to_string();
        }
        if command_line.contains(".jar") {
            let jar = command_line
                .split_whitespace()
                .find(|arg| arg.contains(".jar"))
                .unwrap_or("jar");
            return format!("Java Application - {}", jar);
        }
    }

    if process_name.contains("docker-proxy") {
        return "Docker Container Port Proxy".to_string();
    }

    command_line.to_string()
}

/// `Utility` / `Renderer` for Electron child processes, if any.
fn electron_kind(command_line: &str) -> Option<&'static str> {
    if !command_line.contains(SELF_EXE) {
        return None;
    }
    if command_line.contains("type=utility") {
        Some("Utility")
    } else if command_line.contains("type=renderer") {
        Some("Renderer")
    } else {
        None
    }
}

fn editor_label(command_line: &str, command_lower: &str) -> Option<&'static str> {
    match electron_kind(command_line) {
        Some("Utility") => return Some("VSCode - Utility Process"),
        Some(_) => return Some("VSCode - Renderer Process"),
        None => {}
    }

    if command_lower.contains("pylance") {
        return Some("VSCode - Pylance Language Server");
    }

    if command_line.contains("extensions") && command_line.contains(".js") {
        let label = if command_line.contains("ms-python") {
            "VSCode - Python Extension"
        } else if command_line.contains("ms-vscode") {
            "VSCode - Extension Server"
        } else {
            "VSCode - Extension Process"
        };
        return Some(label);
    }

    None
}

fn node_label(command_line: &str, command_lower: &str) -> Option<String> {
    if let Some((_, label)) = NODE_DEV_SERVERS
        .iter()
        .find(|(needle, _)| command_lower.contains(needle))
    {
        return Some(label.to_string());
    }

    // Runners get the script they run appended.
    for (needle, label) in [("nodemon", "Nodemon"), ("ts-node", "TypeScript Node")] {
        if command_lower.contains(needle) {
            return Some(match command_line.split_whitespace().last() {
                Some(script) => format!("{} - {}", label, script),
                None => label.to_string(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_subprocesses() {
        assert_eq!(
            humanize("/proc/self/exe --type=utility --utility-sub-type=node.mojom.NodeService", "code"),
            "VSCode - Utility Process"
        );
        assert_eq!(
            humanize("/proc/self/exe --type=renderer --enable-crash-reporter", "code"),
            "VSCode - Renderer Process"
        );
        assert_eq!(
            humanize("/snap/code/180/usr/share/code/code /proc/self/exe --type=utility", "electron"),
            "VSCode - Utility Process"
        );
    }

    #[test]
    fn test_editor_language_servers_and_extensions() {
        assert_eq!(
            humanize("/usr/share/code/code ~/.vscode/extensions/ms-python.vscode-pylance/dist/server.bundle.js", "code"),
            "VSCode - Pylance Language Server"
        );
        assert_eq!(
            humanize("code ~/.vscode/extensions/ms-python.python/out/client/extension.js", "code"),
            "VSCode - Python Extension"
        );
        assert_eq!(
            humanize("code ~/.vscode/extensions/ms-vscode.js-debug/src/server.js", "code"),
            "VSCode - Extension Server"
        );
        assert_eq!(
            humanize("code ~/.vscode/extensions/esbenp.prettier/dist/server.js", "code"),
            "VSCode - Extension Process"
        );
    }

    #[test]
    fn test_editor_without_marker_falls_through() {
        assert_eq!(humanize("code --new-window", "code"), "code --new-window");
    }

    #[test]
    fn test_generic_electron() {
        assert_eq!(
            humanize("/proc/self/exe --type=utility --lang=en-US", "slack"),
            "slack - Utility Process"
        );
        assert_eq!(
            humanize("/proc/self/exe --type=renderer", "discord"),
            "discord - Renderer Process"
        );
    }

    #[test]
    fn test_node_dev_servers() {
        assert_eq!(humanize("node node_modules/.bin/vite", "node"), "Vite Dev Server");
        assert_eq!(
            humanize("node node_modules/.bin/webpack serve", "node"),
            "Webpack Dev Server"
        );
        assert_eq!(humanize("node node_modules/.bin/next dev", "node"), "Next.js Dev Server");
        assert_eq!(
            humanize("node node_modules/react-scripts/scripts/start.js", "node"),
            "React Dev Server"
        );
        assert_eq!(
            humanize("node node_modules/.bin/vue-cli-service serve", "node"),
            "Vue Dev Server"
        );
        assert_eq!(humanize("node /usr/bin/nodemon server.js", "node"), "Nodemon - server.js");
        assert_eq!(
            humanize("node /usr/bin/ts-node src/index.ts", "node"),
            "TypeScript Node - src/index.ts"
        );
    }

    #[test]
    fn test_node_pattern_priority() {
        // vite is listed before nodemon, so it wins.
        assert_eq!(humanize("node nodemon --exec vite", "node"), "Vite Dev Server");
        assert_eq!(humanize("NODE NODE_MODULES/.BIN/VITE", "Node"), "Vite Dev Server");
    }

    #[test]
    fn test_python_servers() {
        assert_eq!(
            humanize("python3 manage.py runserver 0.0.0.0:8000", "python3"),
            "Django Dev Server"
        );
        assert_eq!(humanize("python3 -m flask run", "python3"), "Flask Dev Server");
        assert_eq!(humanize("python app.py", "python"), "Flask Dev Server");
        assert_eq!(
            humanize("python3 -m uvicorn main:app --reload", "python3"),
            "Uvicorn (FastAPI/Starlette)"
        );
        assert_eq!(
            humanize("python3 /usr/bin/gunicorn app:app", "python3"),
            "Gunicorn WSGI Server"
        );
    }

    #[test]
    fn test_python_checks_are_case_sensitive() {
        assert_eq!(humanize("python3 -m UVICORN main:app", "python3"), "python3 -m UVICORN main:app");
    }

    #[test]
    fn test_java_applications() {
        assert_eq!(
            humanize("java -jar target/demo.jar --spring.profiles.active=dev", "java"),
            "Spring Boot Application"
        );
        assert_eq!(
            humanize("java -Xmx512m -jar build/libs/service-1.0.jar", "java"),
            "Java Application - build/libs/service-1.0.jar"
        );
        assert_eq!(humanize("java -cp lib Main", "java"), "java -cp lib Main");
    }

    #[test]
    fn test_docker_proxy() {
        assert_eq!(
            humanize(
                "/usr/bin/docker-proxy -proto tcp -host-ip 0.0.0.0 -host-port 5432",
                "docker-proxy"
            ),
            "Docker Container Port Proxy"
        );
    }

    #[test]
    fn test_unrecognized_command_unchanged() {
        assert_eq!(
            humanize("myservice --config=/etc/x.conf", "myservice"),
            "myservice --config=/etc/x.conf"
        );
        assert_eq!(humanize("", "sshd"), "");
    }

    #[test]
    fn test_runtime_patterns_need_matching_process() {
        // Only a node process gets the Node labels.
        assert_eq!(humanize("deno run vite.ts", "deno"), "deno run vite.ts");
        assert_eq!(humanize("ruby manage.py runserver", "ruby"), "ruby manage.py runserver");
    }

    #[test]
    fn test_humanize_is_idempotent_on_labels() {
        for (cmd, name) in [
            ("python3 manage.py runserver", "python3"),
            ("/usr/bin/docker-proxy -proto tcp", "docker-proxy"),
            ("myservice --flag", "myservice"),
        ] {
            let once = humanize(cmd, name);
            assert_eq!(humanize(&once, "unrelated"), once);
            assert_eq!(humanize(cmd, name), once);
        }
    }
}
