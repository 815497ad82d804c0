//! nmap XML report decoding.
//!
//! `parse` turns the document nmap writes with `-oX -` into [`Host`] records.
//! `render` writes hosts back out in the same schema, so a rendered report
//! parses to the hosts it was rendered from.
//!
//! Only the parts of the schema the registry uses are modelled; every other
//! element and attribute (`status`, `hostnames`, `extraports`, `hosthint`,
//! `runstats`, ...) is ignored.

use crate::error::{ScanError, ScanResult};
use crate::types::{Host, Port, PortEntry, PortState};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

const ROOT_ELEMENT: &str = "nmaprun";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename = "nmaprun")]
struct RawRun {
    #[serde(rename = "host", default)]
    hosts: Vec<RawHost>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawHost {
    #[serde(rename = "address", default)]
    addresses: Vec<RawAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ports: Option<RawPorts>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawAddress {
    #[serde(rename = "@addr")]
    addr: String,
    #[serde(rename = "@addrtype", default, skip_serializing_if = "Option::is_none")]
    addrtype: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawPorts {
    #[serde(rename = "port", default)]
    ports: Vec<RawPort>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawPort {
    #[serde(rename = "@protocol", default, skip_serializing_if = "Option::is_none")]
    protocol: Option<String>,
    #[serde(rename = "@portid", default, skip_serializing_if = "Option::is_none")]
    portid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<RawState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service: Option<RawService>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawState {
    #[serde(rename = "@state", default, skip_serializing_if = "Option::is_none")]
    state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawService {
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Decode an nmap XML report into hosts, in document order.
///
/// Fails with [`ScanError::MalformedReport`] on invalid XML, a root other than
/// `<nmaprun>`, a host without an address, or a port missing its protocol,
/// number or state. A port number outside 1-65535 is an error, never a
/// silently dropped port.
pub fn parse(report: &str) -> ScanResult<Vec<Host>> {
    check_root(report)?;

    let run: RawRun = quick_xml::de::from_str(report)
        .map_err(|e| ScanError::MalformedReport(e.to_string()))?;

    run.hosts
        .into_iter()
        .enumerate()
        .map(|(index, raw)| convert_host(index, raw))
        .collect()
}

/// Render hosts as an nmap XML report.
pub fn render(hosts: &[Host]) -> ScanResult<String> {
    let run = RawRun {
        hosts: hosts.iter().map(raw_host).collect(),
    };

    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    run.serialize(serializer)
        .map_err(|e| ScanError::MalformedReport(e.to_string()))?;

    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n", body))
}

/// The deserializer accepts any root element, so check it up front.
fn check_root(report: &str) -> ScanResult<()> {
    let mut reader = Reader::from_str(report);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.name();
                return if name.as_ref() == ROOT_ELEMENT.as_bytes() {
                    Ok(())
                } else {
                    Err(ScanError::MalformedReport(format!(
                        "expected <{}> root element, found <{}>",
                        ROOT_ELEMENT,
                        String::from_utf8_lossy(name.as_ref())
                    )))
                };
            }
            Ok(Event::Eof) => {
                return Err(ScanError::MalformedReport(
                    "report contains no XML elements".to_string(),
                ))
            }
            Ok(_) => {}
            Err(e) => return Err(ScanError::MalformedReport(e.to_string())),
        }
    }
}

fn convert_host(index: usize, raw: RawHost) -> ScanResult<Host> {
    let address = primary_address(&raw.addresses)
        .filter(|addr| !addr.is_empty())
        .ok_or_else(|| ScanError::MalformedReport(format!("host #{} has no address", index + 1)))?
        .to_string();

    let ports = raw
        .ports
        .unwrap_or_default()
        .ports
        .into_iter()
        .map(|port| convert_port(&address, port))
        .collect::<ScanResult<Vec<_>>>()?;

    Ok(Host { address, ports })
}

/// An IP address is the host's identity; a MAC address only wins when
/// nothing else was reported.
fn primary_address(addresses: &[RawAddress]) -> Option<&str> {
    ["ipv4", "ipv6"]
        .iter()
        .find_map(|kind| {
            addresses
                .iter()
                .find(|a| a.addrtype.as_deref() == Some(*kind))
        })
        .or_else(|| addresses.first())
        .map(|a| a.addr.trim())
}

fn convert_port(address: &str, raw: RawPort) -> ScanResult<PortEntry> {
    let malformed = |what: &str| ScanError::MalformedReport(format!("{} on host {}", what, address));

    let protocol = raw
        .protocol
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| malformed("port without protocol"))?;

    let number: Port = raw
        .portid
        .as_deref()
        .ok_or_else(|| malformed("port without portid"))?
        .parse()
        .map_err(|e| malformed(&format!("{}", e)))?;

    let state = raw
        .state
        .and_then(|s| s.state)
        .filter(|s| !s.is_empty())
        .map(PortState::from)
        .ok_or_else(|| malformed(&format!("port {}/{} without state", number, protocol)))?;

    let service = raw.service.and_then(|s| s.name).unwrap_or_default();

    Ok(PortEntry {
        number,
        protocol,
        state,
        service,
    })
}

fn raw_host(host: &Host) -> RawHost {
    let addrtype = match host.address.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => Some("ipv4".to_string()),
        Ok(IpAddr::V6(_)) => Some("ipv6".to_string()),
        Err(_) => None,
    };

    let ports = (!host.ports.is_empty()).then(|| RawPorts {
        ports: host
            .ports
            .iter()
            .map(|port| RawPort {
                protocol: Some(port.protocol.clone()),
                portid: Some(port.number.to_string()),
                state: Some(RawState {
                    state: Some(port.state.to_string()),
                }),
                service: (!port.service.is_empty()).then(|| RawService {
                    name: Some(port.service.clone()),
                }),
            })
            .collect(),
    });

    RawHost {
        addresses: vec![RawAddress {
            addr: host.address.clone(),
            addrtype,
        }],
        ports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NMAP_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<?xml-stylesheet href="file:///usr/bin/../share/nmap/nmap.xsl" type="text/xsl"?>
<nmaprun scanner="nmap" args="nmap -oX - -p- 10.0.0.5 10.0.0.6" start="1700000000" version="7.94" xmloutputversion="1.05">
<scaninfo type="syn" protocol="tcp" numservices="65535" services="1-65535"/>
<verbose level="0"/>
<debugging level="0"/>
<hosthint><status state="up" reason="arp-response" reason_ttl="0"/>
<address addr="10.0.0.5" addrtype="ipv4"/>
</hosthint>
<host starttime="1700000001" endtime="1700000009"><status state="up" reason="arp-response" reason_ttl="0"/>
<address addr="10.0.0.5" addrtype="ipv4"/>
<address addr="AA:BB:CC:DD:EE:FF" addrtype="mac" vendor="Acme"/>
<hostnames>
<hostname name="web.lan" type="PTR"/>
</hostnames>
<ports><extraports state="closed" count="65532">
<extrareasons reason="reset" count="65532" proto="tcp" ports="1-21,23-79,81-442,444-65535"/>
</extraports>
<port protocol="tcp" portid="22"><state state="open" reason="syn-ack" reason_ttl="64"/><service name="ssh" method="table" conf="3"/></port>
<port protocol="tcp" portid="80"><state state="open" reason="syn-ack" reason_ttl="64"/><service name="http" method="table" conf="3"/></port>
<port protocol="tcp" portid="443"><state state="filtered" reason="no-response" reason_ttl="0"/></port>
</ports>
<times srtt="250" rttvar="100" to="100000"/>
</host>
<hosthint><status state="up" reason="arp-response" reason_ttl="0"/>
<address addr="10.0.0.6" addrtype="ipv4"/>
</hosthint>
<host starttime="1700000001" endtime="1700000009"><status state="up" reason="arp-response" reason_ttl="0"/>
<address addr="10.0.0.6" addrtype="ipv4"/>
<ports><extraports state="closed" count="65535">
<extrareasons reason="reset" count="65535" proto="tcp" ports="1-65535"/>
</extraports>
</ports>
</host>
<runstats><finished time="1700000010" timestr="Tue Nov 14 22:13:30 2023" summary="Nmap done; 2 IP addresses (2 hosts up) scanned in 9.50 seconds" elapsed="9.50" exit="success"/><hosts up="2" down="0" total="2"/>
</runstats>
</nmaprun>
"#;

    fn report_with_port(port: &str) -> String {
        format!(
            r#"<nmaprun><host><address addr="10.0.0.5" addrtype="ipv4"/><ports>{}</ports></host></nmaprun>"#,
            port
        )
    }

    #[test]
    fn test_parse_full_report() {
        let hosts = parse(NMAP_REPORT).unwrap();
        assert_eq!(hosts.len(), 2);

        let web = &hosts[0];
        assert_eq!(web.address, "10.0.0.5");
        let lines: Vec<String> = web.ports.iter().map(|p| p.to_string()).collect();
        assert_eq!(lines, vec!["22/tcp open ssh", "80/tcp open http", "443/tcp filtered"]);

        assert_eq!(hosts[1].address, "10.0.0.6");
        assert!(hosts[1].ports.is_empty());
    }

    #[test]
    fn test_parse_empty_run() {
        let hosts = parse(r#"<?xml version="1.0"?><nmaprun scanner="nmap"></nmaprun>"#).unwrap();
        assert!(hosts.is_empty());
    }

    #[test]
    fn test_parse_host_without_ports_element() {
        let hosts =
            parse(r#"<nmaprun><host><address addr="192.168.1.1" addrtype="ipv4"/></host></nmaprun>"#)
                .unwrap();
        assert_eq!(hosts, vec![Host::new("192.168.1.1")]);
    }

    #[test]
    fn test_parse_prefers_ip_over_mac() {
        let report = r#"<nmaprun><host>
            <address addr="AA:BB:CC:DD:EE:FF" addrtype="mac"/>
            <address addr="fe80::1" addrtype="ipv6"/>
            </host></nmaprun>"#;
        assert_eq!(parse(report).unwrap()[0].address, "fe80::1");
    }

    #[test]
    fn test_parse_missing_service_name() {
        let hosts = parse(&report_with_port(
            r#"<port protocol="udp" portid="53"><state state="open|filtered"/><service method="table"/></port>"#,
        ))
        .unwrap();
        let port = &hosts[0].ports[0];
        assert_eq!(port.service, "");
        assert_eq!(port.state, PortState::OpenFiltered);
    }

    #[test]
    fn test_parse_rejects_bad_port_numbers() {
        for portid in ["0", "65536", "http", ""] {
            let report = report_with_port(&format!(
                r#"<port protocol="tcp" portid="{}"><state state="open"/></port>"#,
                portid
            ));
            assert!(
                matches!(parse(&report), Err(ScanError::MalformedReport(_))),
                "portid {portid:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_missing_attributes() {
        let missing = [
            r#"<port portid="80"><state state="open"/></port>"#,
            r#"<port protocol="tcp"><state state="open"/></port>"#,
            r#"<port protocol="tcp" portid="80"></port>"#,
        ];
        for port in missing {
            assert!(matches!(
                parse(&report_with_port(port)),
                Err(ScanError::MalformedReport(_))
            ));
        }
    }

    #[test]
    fn test_parse_rejects_host_without_address() {
        let err = parse("<nmaprun><host><ports/></host></nmaprun>").unwrap_err();
        assert!(err.to_string().contains("no address"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for report in ["", "Starting Nmap 7.94", "<nmaprun><host>", "<scan></scan>"] {
            assert!(
                matches!(parse(report), Err(ScanError::MalformedReport(_))),
                "{report:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_render_then_parse_round_trip() {
        let hosts = parse(NMAP_REPORT).unwrap();
        let rendered = render(&hosts).unwrap();
        assert_eq!(parse(&rendered).unwrap(), hosts);
    }

    #[test]
    fn test_render_round_trip_keeps_unusual_values() {
        let hosts = vec![
            Host::new("scanme.example").with_ports(vec![
                PortEntry::new(Port::new(65535).unwrap(), "sctp", PortState::from("tcpwrapped"), ""),
                PortEntry::new(Port::new(1).unwrap(), "udp", PortState::ClosedFiltered, "a&b"),
            ]),
            Host::new("::1"),
        ];
        let rendered = render(&hosts).unwrap();
        assert_eq!(parse(&rendered).unwrap(), hosts);
    }
}
