pub struct Utils;

impl Utils {
    /// Parse an address:port string.
    ///
    /// Handles multiple address formats:
    /// - IPv4: "127.0.0.1:3000" or "*:8080"
    /// - IPv6: "\[::1]:3000" or "\[fe80::1]:8080"
    /// - Interface-scoped: "127.0.0.53%lo:53" or "\[fe80::1]%eth0:546"
    ///
    /// The interface suffix is dropped from the returned address.
    pub fn parse_address(address: &str) -> Option<(String, u16)> {
        let last_colon = address.rfind(':')?;
        let host = &address[..last_colon];
        let port: u16 = address[last_colon + 1..].parse().ok()?;

        // An IPv6 host must be fully bracketed before the port separator.
        if host.starts_with('[') && !host.contains(']') {
            return None;
        }

        let host = host.split('%').next().unwrap_or(host);
        let host = if host.is_empty() { "*" } else { host };
        Some((host.to_string(), port))
    }
}
