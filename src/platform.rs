/// Display labels of the operating systems a Go release is built for.
pub mod os {
    pub const MAC: &str = "macOS";
    pub const LINUX: &str = "Linux";
    pub const WIN: &str = "Windows";
    pub const FREEBSD: &str = "FreeBSD";
    pub const NETBSD: &str = "NetBSD";
    pub const OPENBSD: &str = "OpenBSD";
    pub const DRAGONFLYBSD: &str = "DragonFly BSD";
    pub const ILLUMOS: &str = "illumos";
    pub const SOLARIS: &str = "Solaris";
    pub const AIX: &str = "AIX";
    pub const PLAN9: &str = "Plan 9";
}

/// Display labels of the CPU architectures that are not shown as their Go token.
pub mod cpu {
    pub const X86: &str = "x86";
    pub const X64: &str = "x86-64";
    pub const ARM64: &str = "ARM64";
    pub const ARMV6L: &str = "ARMv6";
}

/// Go OS tokens (the `GOOS` part of `linux-amd64`) and their labels.
pub const OS_TOKENS: &[(&str, &str)] = &[
    ("darwin", os::MAC),
    ("linux", os::LINUX),
    ("windows", os::WIN),
    ("freebsd", os::FREEBSD),
    ("netbsd", os::NETBSD),
    ("openbsd", os::OPENBSD),
    ("dragonfly", os::DRAGONFLYBSD),
    ("illumos", os::ILLUMOS),
    ("solaris", os::SOLARIS),
    ("aix", os::AIX),
    ("plan9", os::PLAN9),
];

/// Go architecture tokens with a display label of their own.
/// Tokens missing here (`ppc64le`, `s390x`, `riscv64`, ...) are shown unchanged.
pub const CPU_TOKENS: &[(&str, &str)] = &[
    ("amd64", cpu::X64),
    ("386", cpu::X86),
    ("arm64", cpu::ARM64),
    ("armv6l", cpu::ARMV6L),
];

pub fn os_label(token: &str) -> Option<&'static str> {
    OS_TOKENS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, label)| *label)
}

pub fn cpu_label(token: &str) -> &str {
    CPU_TOKENS
        .iter()
        .find(|(t, _)| *t == token)
        .map_or(token, |(_, label)| *label)
}

pub fn os_token(label: &str) -> Option<&'static str> {
    OS_TOKENS
        .iter()
        .find(|(_, l)| *l == label)
        .map(|(token, _)| *token)
}

pub fn cpu_token(label: &str) -> &str {
    CPU_TOKENS
        .iter()
        .find(|(_, l)| *l == label)
        .map_or(label, |(token, _)| *token)
}

#[allow(unreachable_code)]
pub fn current_os() -> Option<&'static str> {
    #[cfg(target_os = "windows")]
    return Some(os::WIN);

    #[cfg(target_os = "linux")]
    return Some(os::LINUX);

    #[cfg(target_os = "macos")]
    return Some(os::MAC);

    #[cfg(target_os = "freebsd")]
    return Some(os::FREEBSD);

    #[cfg(target_os = "netbsd")]
    return Some(os::NETBSD);

    #[cfg(target_os = "openbsd")]
    return Some(os::OPENBSD);

    None
}

#[allow(unreachable_code)]
pub fn current_cpu() -> Option<&'static str> {
    #[cfg(target_arch = "x86")]
    return Some(cpu::X86);

    #[cfg(target_arch = "x86_64")]
    return Some(cpu::X64);

    #[cfg(target_arch = "aarch64")]
    return Some(cpu::ARM64);

    #[cfg(target_arch = "arm")]
    return Some(cpu::ARMV6L);

    #[cfg(target_arch = "riscv64")]
    return Some("riscv64");

    #[cfg(target_arch = "s390x")]
    return Some("s390x");

    None
}
