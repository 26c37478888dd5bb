pub const DESKTOP_STYLES: &str = r#"
:root {
    --desktop-bg: #3a6ea5;
    --window-bg: #ece9d8;
    --window-border: #0054e3;
    --titlebar-bg: linear-gradient(to bottom, #0058e6, #3a93ff);
    --titlebar-inactive-bg: linear-gradient(to bottom, #7a96df, #a6b8e8);
    --taskbar-bg: linear-gradient(to bottom, #245edb, #1941a5);
    --start-bg: linear-gradient(to bottom, #3c9a3c, #2d7d2d);
    --control-bg: #2f6fed;
    --danger-bg: #e04343;
    --text-muted: #6b7280;
    --shadow-lg: 2px 2px 10px rgba(0, 0, 0, 0.5);
}

* {
    box-sizing: border-box;
}

html, body, #main {
    width: 100%;
    height: 100%;
    margin: 0;
    padding: 0;
    overflow: hidden;
    overscroll-behavior: none;
}

body {
    font-family: Tahoma, 'Segoe UI', sans-serif;
    background: var(--desktop-bg);
}

.desktop-icon:hover span,
.desktop-icon:focus span {
    background: rgba(49, 106, 197, 0.8);
}

.taskbar-button:hover {
    filter: brightness(1.15);
}

.start-menu-item:hover {
    background: #316ac5;
    color: white;
}

.window-controls button:hover {
    filter: brightness(1.2);
}
"#;
