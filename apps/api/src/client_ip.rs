//! Client address resolution behind optional reverse proxies.

use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap};
use ipnet::IpNet;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolves the address used to throttle anonymous callers.
///
/// `X-Forwarded-For` is honoured only when the socket peer is a trusted
/// proxy. The header is read right to left and the first hop that is not
/// itself a trusted proxy wins, so clients cannot spoof the left-most entry.
pub fn resolve_client_ip(
    extensions: &Extensions,
    headers: &HeaderMap,
    trusted_proxies: &[IpNet],
) -> Option<IpAddr> {
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| address.ip())?;

    if !is_trusted(peer, trusted_proxies) {
        return Some(peer);
    }

    let forwarded = headers
        .get_all(FORWARDED_FOR)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter_map(|entry| entry.parse::<IpAddr>().ok())
        .collect::<Vec<_>>();

    Some(
        forwarded
            .into_iter()
            .rev()
            .find(|hop| !is_trusted(*hop, trusted_proxies))
            .unwrap_or(peer),
    )
}

fn is_trusted(address: IpAddr, trusted_proxies: &[IpNet]) -> bool {
    trusted_proxies
        .iter()
        .any(|network| network.contains(&address))
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use axum::extract::ConnectInfo;
    use axum::http::{Extensions, HeaderMap, HeaderValue};
    use ipnet::IpNet;

    use super::resolve_client_ip;

    fn peer(address: [u8; 4]) -> Extensions {
        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(SocketAddr::from((address, 40_000))));
        extensions
    }

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    fn proxies() -> Vec<IpNet> {
        "10.0.0.0/8"
            .parse::<IpNet>()
            .map(|network| vec![network])
            .unwrap_or_default()
    }

    fn ip(a: u8, b: u8, c: u8, d: u8) -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(a, b, c, d)))
    }

    #[test]
    fn untrusted_peer_header_is_ignored() {
        let resolved =
            resolve_client_ip(&peer([1, 2, 3, 4]), &forwarded("9.9.9.9"), &proxies());
        assert_eq!(resolved, ip(1, 2, 3, 4));
    }

    #[test]
    fn trusted_peer_uses_the_nearest_untrusted_hop() {
        let resolved = resolve_client_ip(
            &peer([10, 0, 0, 2]),
            &forwarded("6.6.6.6, 1.2.3.4, 10.0.0.9"),
            &proxies(),
        );
        assert_eq!(resolved, ip(1, 2, 3, 4));
    }

    #[test]
    fn trusted_peer_without_header_is_the_client() {
        let resolved = resolve_client_ip(&peer([10, 0, 0, 2]), &HeaderMap::new(), &proxies());
        assert_eq!(resolved, ip(10, 0, 0, 2));
    }

    #[test]
    fn missing_peer_resolves_nothing() {
        let resolved = resolve_client_ip(&Extensions::new(), &forwarded("1.2.3.4"), &proxies());
        assert_eq!(resolved, None);
    }
}
