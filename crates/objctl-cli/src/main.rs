fn main() {
    // Reset SIGPIPE to default behavior to prevent panic on broken pipe
    // (e.g., when piping to `head` or `less` that exits early)
    #[cfg(unix)]
    reset_sigpipe();

    let code = objctl::main_with_args(std::env::args_os());
    std::process::exit(code);
}

#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: called once at startup before any other thread exists.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
